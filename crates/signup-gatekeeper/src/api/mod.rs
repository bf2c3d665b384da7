//! HTTP API for the signup gatekeeper.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::store::AccountStore;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use identity_client::IdentityClient;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Account store
    pub store: Arc<AccountStore>,
    /// Identity service client
    pub identity: Arc<IdentityClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: AccountStore, identity: IdentityClient) -> Self {
        Self {
            store: Arc::new(store),
            identity: Arc::new(identity),
        }
    }
}

/// Create the API router.
///
/// CORS is wide open; this service fronts a browser demo and is not meant
/// to be exposed as-is. Restrict the origin before any real deployment.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/create-account", post(handlers::create_account))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
