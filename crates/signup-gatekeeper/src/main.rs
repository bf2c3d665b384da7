//! Signup Gatekeeper - Entry point.

use identity_client::IdentityClient;
use secrecy::ExposeSecret;
use signup_gatekeeper::{
    api::{create_router, AppState},
    config::Config,
    store::AccountStore,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Signup Gatekeeper");

    // Open the account store
    let store = match AccountStore::open(&config.database.path).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open account store: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize identity service client
    let identity = match IdentityClient::new(
        config.identity.api_key.expose_secret().clone(),
        config.identity.api_url.clone(),
        config.identity.timeout,
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create identity client: {}", e);
            std::process::exit(1);
        }
    };

    // Create application state and router
    let state = AppState::new(store, identity);
    let app = create_router(state);

    // Bind to address
    let addr = match config.server.socket_addr() {
        Ok(a) => a,
        Err(e) => {
            error!("Invalid server configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
