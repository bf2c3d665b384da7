//! Device identity API HTTP client.

use crate::error::IdentityError;
use crate::types::IdentityEvent;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Device identity API client.
///
/// Resolves a short-lived request token into an identity event. The API
/// key is stored using `SecretString` to prevent accidental exposure in
/// logs or debug output.
#[derive(Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl IdentityClient {
    /// Create a new identity client.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: SecretString::new(api_key.into()),
        })
    }

    /// Fetch the identity event for a request token.
    ///
    /// One synchronous lookup, no retries. A token the service does not
    /// recognize comes back as `UnknownRequestId`.
    #[instrument(skip(self))]
    pub async fn get_event(&self, request_id: &str) -> Result<IdentityEvent, IdentityError> {
        let response = self
            .client
            .get(format!("{}/events/{}", self.base_url, request_id))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            // Truncation must land on a char boundary; fall back to the
            // whole body when byte 200 splits a multibyte character.
            debug!("Identity event body: {}", body.get(..200).unwrap_or(&body));
            serde_json::from_str(&body)
                .map_err(|e| IdentityError::MalformedResponse(e.to_string()))
        } else {
            Err(self.extract_error(request_id, response).await)
        }
    }

    /// Health check - returns true if the identity API is reachable.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/events/health-probe", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await
            .map(|r| r.status() != StatusCode::UNAUTHORIZED && !r.status().is_server_error())
            .unwrap_or(false)
    }

    /// Extract error information from a failed response.
    async fn extract_error(&self, request_id: &str, response: reqwest::Response) -> IdentityError {
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Identity API authentication failed");
                IdentityError::Unauthorized
            }
            StatusCode::NOT_FOUND => {
                warn!(request_id = %request_id, "Request id not known to identity API");
                IdentityError::UnknownRequestId(request_id.to_string())
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".into());
                IdentityError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}
