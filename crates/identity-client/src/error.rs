//! Identity service client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Unknown request id: {0}")]
    UnknownRequestId(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Malformed identity event: {0}")]
    MalformedResponse(String),
}
