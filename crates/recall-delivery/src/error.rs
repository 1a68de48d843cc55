//! Delivery error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The messaging provider rejected the request.
    #[error("provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider accepted the request but the reply was unreadable.
    #[error("parse error: {0}")]
    Parse(String),

    /// Required credentials are missing.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}
