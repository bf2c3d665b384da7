//! HTTP request handlers.

use super::types::{CreateAccountRequest, CreateAccountResponse, HealthResponse};
use super::AppState;
use crate::error::GateError;
use crate::gate;
use axum::extract::State;
use axum::Json;
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let account_count = state.store.count_accounts().await.unwrap_or(0);
    let identity_healthy = state.identity.health_check().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        account_count,
        identity_api_healthy: identity_healthy,
    })
}

/// Create an account, unless the device is a bot or already has one.
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, GateError> {
    info!("Account creation request received");

    let account_id = gate::evaluate_signup(
        &state.store,
        &state.identity,
        request.username.as_deref(),
        request.password.as_deref(),
        request.request_id.as_deref(),
    )
    .await?;

    Ok(Json(CreateAccountResponse {
        status: "ok".to_string(),
        account_id,
    }))
}
