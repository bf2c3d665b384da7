//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to create an account.
///
/// Every field is optional at the serde level so that an absent field
/// reaches the gatekeeper's own validation (and its 400 naming the field)
/// instead of a generic deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Token produced by the client-side identity collection step
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Response after a successful account creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    pub status: String,
    pub account_id: i64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub account_count: i64,
    pub identity_api_healthy: bool,
}
