//! Twilio SMS configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("https://api.twilio.com/2010-04-01")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,

    #[serde(default)]
    pub auth_token: String,

    /// Sender number in E.164 form.
    #[serde(default)]
    pub from_number: String,

    /// Learner's phone number in E.164 form.
    #[serde(default)]
    pub to_number: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            to_number: String::new(),
            base_url: default_base_url(),
        }
    }
}

impl TwilioConfig {
    /// All four credentials are needed to send anything.
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty()
            && !self.auth_token.is_empty()
            && !self.from_number.is_empty()
            && !self.to_number.is_empty()
    }

    /// The Messages resource for this account.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!TwilioConfig::default().is_configured());
    }

    #[test]
    fn configured_when_all_fields_set() {
        let config = TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+15550001111".into(),
            to_number: "+15552223333".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(
            config.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn missing_recipient_is_not_configured() {
        let config = TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+15550001111".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
