//! Twilio Messages API sink.

use std::time::Duration;

use recall_config::TwilioConfig;
use serde::Deserialize;

use crate::{DeliveryError, DeliveryReceipt, MessageSink, fit_to_channel};

/// Accepted message as returned by `POST .../Messages.json`.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

/// Twilio error body: `{"code": 21211, "message": "...", "status": 400}`.
#[derive(Debug, Deserialize)]
struct TwilioFault {
    code: Option<u32>,
    message: Option<String>,
}

/// Sends SMS through one Twilio account to one recipient.
pub struct TwilioSink {
    http: reqwest::Client,
    config: TwilioConfig,
    cap: usize,
}

impl TwilioSink {
    /// # Errors
    ///
    /// Returns [`DeliveryError::NotConfigured`] when any credential is
    /// missing, or [`DeliveryError::Http`] if the client fails to build.
    pub fn new(config: &TwilioConfig, cap: usize) -> Result<Self, DeliveryError> {
        if !config.is_configured() {
            return Err(DeliveryError::NotConfigured("twilio"));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("recall/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
            cap,
        })
    }

    fn request(&self, body: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", self.config.to_number.as_str()),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
    }
}

impl MessageSink for TwilioSink {
    fn name(&self) -> &'static str {
        "twilio"
    }

    fn cap(&self) -> usize {
        self.cap
    }

    async fn send(&self, body: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let (body, truncated) = fit_to_channel(body, self.cap);
        let resp = self.request(&body).send().await?;

        let message = read_reply(resp).await?;
        tracing::info!(
            sid = message.sid.as_deref().unwrap_or("-"),
            status = message.status.as_deref().unwrap_or("-"),
            truncated,
            "sms accepted"
        );
        Ok(DeliveryReceipt {
            channel: self.name(),
            message_id: message.sid,
            chars: body.chars().count(),
            truncated,
        })
    }
}

async fn read_reply(resp: reqwest::Response) -> Result<MessageResource, DeliveryError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(DeliveryError::Api {
            status: status.as_u16(),
            message: fault_message(&text),
        });
    }
    serde_json::from_str(&text).map_err(|e| DeliveryError::Parse(e.to_string()))
}

fn fault_message(body: &str) -> String {
    match serde_json::from_str::<TwilioFault>(body) {
        Ok(TwilioFault {
            code: Some(code),
            message: Some(message),
        }) => format!("{message} (code {code})"),
        Ok(TwilioFault {
            message: Some(message),
            ..
        }) => message,
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC0123".into(),
            auth_token: "secret".into(),
            from_number: "+15550001111".into(),
            to_number: "+15552223333".into(),
            ..Default::default()
        }
    }

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[test]
    fn unconfigured_sink_is_rejected() {
        let result = TwilioSink::new(&TwilioConfig::default(), 1500);
        assert!(matches!(result, Err(DeliveryError::NotConfigured("twilio"))));
    }

    #[test]
    fn request_is_form_encoded_with_basic_auth() {
        let sink = TwilioSink::new(&config(), 1500).unwrap();
        let request = sink.request("一 & two").build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC0123/Messages.json"
        );
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert!(
            request
                .headers()
                .contains_key(reqwest::header::AUTHORIZATION)
        );
        let body = request.body().and_then(reqwest::Body::as_bytes).unwrap();
        assert_eq!(
            std::str::from_utf8(body).unwrap(),
            "To=%2B15552223333&From=%2B15550001111&Body=%E4%B8%80+%26+two"
        );
    }

    #[tokio::test]
    async fn accepted_reply_yields_sid() {
        let resp = mock_response(
            201,
            r#"{"sid": "SM87105da94bff44b999e4e6eb90d8eb6a", "status": "queued", "num_segments": "1"}"#,
        );
        let message = read_reply(resp).await.unwrap();
        assert_eq!(
            message.sid.as_deref(),
            Some("SM87105da94bff44b999e4e6eb90d8eb6a")
        );
        assert_eq!(message.status.as_deref(), Some("queued"));
    }

    #[tokio::test]
    async fn rejected_reply_carries_twilio_message() {
        let resp = mock_response(
            400,
            r#"{"code": 21211, "message": "The 'To' number is not a valid phone number.", "status": 400}"#,
        );
        let err = read_reply(resp).await.unwrap_err();
        match err {
            DeliveryError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(
                    message,
                    "The 'To' number is not a valid phone number. (code 21211)"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn garbage_success_body_is_a_parse_error() {
        let resp = mock_response(201, "<html>");
        assert!(matches!(
            read_reply(resp).await,
            Err(DeliveryError::Parse(_))
        ));
    }

    #[test]
    fn fault_message_falls_back_to_body() {
        assert_eq!(fault_message("Service Unavailable"), "Service Unavailable");
    }
}
