//! Commentary error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentaryError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The reply did not contain usable commentary.
    #[error("parse error: {0}")]
    Parse(String),

    /// Missing key or invalid header values.
    #[error("commentary is not configured: {0}")]
    Config(String),
}
