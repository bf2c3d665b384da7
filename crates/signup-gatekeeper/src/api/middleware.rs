//! Request logging middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};

/// Log each request with its signup outcome class.
///
/// The outcome string mirrors the terminal states of the request flow:
/// accepted, rejected for policy (bot / duplicate device), invalid input,
/// or failed.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = start.elapsed();
    let outcome = outcome_class(status.as_u16());

    if status.is_server_error() {
        warn!(%method, %path, %status, ?elapsed, outcome, "Request failed");
    } else {
        info!(%method, %path, %status, ?elapsed, outcome, "Request handled");
    }

    response
}

fn outcome_class(status: u16) -> &'static str {
    match status {
        200 => "accepted",
        400 => "invalid_input",
        403 => "bot_rejected",
        429 => "duplicate_rejected",
        500 => "failed",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_class_covers_signup_terminals() {
        assert_eq!(outcome_class(200), "accepted");
        assert_eq!(outcome_class(400), "invalid_input");
        assert_eq!(outcome_class(403), "bot_rejected");
        assert_eq!(outcome_class(429), "duplicate_rejected");
        assert_eq!(outcome_class(500), "failed");
    }

    #[test]
    fn test_outcome_class_other_statuses() {
        assert_eq!(outcome_class(404), "other");
        assert_eq!(outcome_class(204), "other");
    }
}
