//! WaniKani API configuration.

use serde::{Deserialize, Serialize};

/// Default API root.
fn default_base_url() -> String {
    String::from("https://api.wanikani.com/v2")
}

/// API revision sent as the `Wanikani-Revision` header.
fn default_revision() -> String {
    String::from("20170710")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WaniKaniConfig {
    /// Personal API token (read-only scope is enough).
    #[serde(default)]
    pub api_token: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_revision")]
    pub revision: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WaniKaniConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_base_url(),
            revision: default_revision(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WaniKaniConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_token.is_empty()
    }

    /// Absolute URL for an API path such as `/review_statistics`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = WaniKaniConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.base_url, "https://api.wanikani.com/v2");
        assert_eq!(config.revision, "20170710");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = WaniKaniConfig {
            base_url: "http://localhost:8080/v2/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint("/subjects/440"),
            "http://localhost:8080/v2/subjects/440"
        );
        assert_eq!(config.endpoint("user"), "http://localhost:8080/v2/user");
    }
}
