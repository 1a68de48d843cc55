//! Core error types.
//!
//! Transport and configuration errors live in their own crates
//! (`SourceError`, `ConfigError`); they converge as `anyhow::Error` in
//! `recall-cli`.

use thiserror::Error;

/// Errors raised while parsing or validating core values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A category name that is not radical, kanji or vocabulary.
    #[error("unknown subject category: {0}")]
    UnknownCategory(String),

    /// A session mode name that is not recognised.
    #[error("unknown session mode: {0}")]
    UnknownMode(String),

    /// A setting that would make selection or rendering meaningless.
    #[error("invalid setting '{field}': {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
