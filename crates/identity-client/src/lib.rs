//! Typed client for the external device identity API.
//!
//! Exchanges an opaque request token for an identity event carrying the
//! visitor identifier and a bot detection verdict.

mod client;
mod error;
mod types;

pub use client::IdentityClient;
pub use error::IdentityError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(mock_server: &MockServer) -> IdentityClient {
        IdentityClient::new("test-api-key", mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_event_success() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "products": {
                "identification": {
                    "data": { "visitorId": "V1" }
                },
                "botd": {
                    "data": { "bot": { "result": "notDetected" } }
                }
            }
        });

        Mock::given(method("GET"))
            .and(path("/events/tok-1"))
            .and(header("Authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let event = client.get_event("tok-1").await.unwrap();

        assert_eq!(event.visitor_id(), Some("V1"));
        assert!(!event.bot_verdict().is_detected());
    }

    #[tokio::test]
    async fn test_get_event_unknown_request_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events/no-such-token"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.get_event("no-such-token").await;

        assert!(matches!(result, Err(IdentityError::UnknownRequestId(_))));
    }

    #[tokio::test]
    async fn test_get_event_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events/tok-1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.get_event("tok-1").await;

        assert!(matches!(result, Err(IdentityError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_get_event_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events/tok-1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.get_event("tok-1").await;

        match result {
            Err(IdentityError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_get_event_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events/tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.get_event("tok-1").await;

        assert!(matches!(result, Err(IdentityError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_long_multibyte_body_logged_without_panicking() {
        // Force the debug event to evaluate its fields.
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .finish(),
        );

        let mock_server = MockServer::start().await;

        // Non-JSON body longer than the log preview window, with a
        // multibyte character straddling byte 200.
        let mut body = "x".repeat(199);
        body.push('é');
        body.push_str(&"y".repeat(50));

        Mock::given(method("GET"))
            .and(path("/events/tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.get_event("tok-1").await;

        assert!(matches!(result, Err(IdentityError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_network_failure_maps_to_http_error() {
        // Port nothing is listening on
        let client =
            IdentityClient::new("test-api-key", "http://127.0.0.1:9", Duration::from_secs(1))
                .unwrap();

        let result = client.get_event("tok-1").await;
        assert!(matches!(result, Err(IdentityError::Http(_))));
    }
}
