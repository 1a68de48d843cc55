//! # recall-config
//!
//! Layered configuration loading for Recall using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RECALL_*` prefix, `__` as separator)
//! 2. Project-level `.recall/config.toml`
//! 3. User-level `~/.config/recall/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RECALL_WANIKANI__API_TOKEN` -> `wanikani.api_token`,
//! `RECALL_SESSION__MAX_ITEMS` -> `session.max_items`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use recall_config::RecallConfig;
//!
//! let config = RecallConfig::load_with_dotenv().expect("config");
//!
//! if config.twilio.is_configured() {
//!     println!("SMS to {}", config.twilio.to_number);
//! }
//! ```

mod commentary;
mod error;
mod twilio;
mod wanikani;

pub use commentary::CommentaryConfig;
pub use error::ConfigError;
pub use twilio::TwilioConfig;
pub use wanikani::WaniKaniConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use recall_core::SessionSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecallConfig {
    #[serde(default)]
    pub wanikani: WaniKaniConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub commentary: CommentaryConfig,
    #[serde(default)]
    pub session: SessionSettings,
}

impl RecallConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".recall/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("RECALL_").split("__"))
    }

    /// Reject settings that cannot produce a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        if self.wanikani.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "wanikani.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The WaniKani section, or an error when no token is set.
    pub fn require_wanikani(&self) -> Result<&WaniKaniConfig, ConfigError> {
        if self.wanikani.is_configured() {
            Ok(&self.wanikani)
        } else {
            Err(ConfigError::NotConfigured {
                section: "wanikani".to_string(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("recall").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
