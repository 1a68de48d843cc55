//! Commentary (language model) configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("https://api.anthropic.com/v1")
}

fn default_model() -> String {
    String::from("claude-3-5-haiku-latest")
}

const fn default_max_tokens() -> u32 {
    600
}

const fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommentaryConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Set to false to skip commentary even when a key is present.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            enabled: default_enabled(),
        }
    }
}

impl CommentaryConfig {
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}
