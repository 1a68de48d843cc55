//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required configuration section is not configured.
    #[error("Configuration section '{section}' is not configured (missing required fields)")]
    NotConfigured { section: String },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<recall_core::CoreError> for ConfigError {
    fn from(error: recall_core::CoreError) -> Self {
        match error {
            recall_core::CoreError::InvalidSetting { field, reason } => Self::InvalidValue {
                field: format!("session.{field}"),
                reason,
            },
            other => Self::InvalidValue {
                field: "session".to_string(),
                reason: other.to_string(),
            },
        }
    }
}
