//! Anthropic Messages API commentary source.

use std::collections::HashSet;
use std::time::Duration;

use recall_config::CommentaryConfig;
use recall_core::CommentaryMap;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{CommentaryError, CommentaryRequest, CommentarySource};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "You explain Japanese kanji and vocabulary to a learner. \
For every item you are given, write one sentence under 120 characters about its \
etymology or a vivid memory hook. Reply with a single JSON object whose keys are the \
items' characters exactly as given and whose values are the sentences. No other text.";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Asks a Claude model for one note per item in a single request.
pub struct AnthropicCommentary {
    http: reqwest::Client,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl AnthropicCommentary {
    /// # Errors
    ///
    /// Returns [`CommentaryError::Config`] when commentary is disabled, the
    /// key is missing or not a valid header value.
    pub fn new(config: &CommentaryConfig) -> Result<Self, CommentaryError> {
        if !config.is_configured() {
            return Err(CommentaryError::Config("no API key, or disabled".into()));
        }

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| CommentaryError::Config("invalid API key format".into()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn try_annotate(
        &self,
        requests: &[CommentaryRequest],
    ) -> Result<CommentaryMap, CommentaryError> {
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![AnthropicMessage {
                role: "user",
                content: user_prompt(requests),
            }],
        };

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .json(&request)
            .send()
            .await?;
        let text = reply_text(response).await?;
        parse_commentary(&text, requests)
    }
}

impl CommentarySource for AnthropicCommentary {
    async fn annotate(&self, requests: &[CommentaryRequest]) -> CommentaryMap {
        if requests.is_empty() {
            return CommentaryMap::new();
        }
        match self.try_annotate(requests).await {
            Ok(map) => {
                tracing::debug!(notes = map.len(), "commentary received");
                map
            }
            Err(e) => {
                tracing::warn!(%e, "commentary unavailable, continuing without it");
                CommentaryMap::new()
            }
        }
    }
}

fn user_prompt(requests: &[CommentaryRequest]) -> String {
    let mut prompt = String::from("Items:\n");
    for request in requests {
        prompt.push_str(&format!(
            "- {} ({}): {}",
            request.characters,
            request.category,
            request.meanings.join(", ")
        ));
        if !request.readings.is_empty() {
            prompt.push_str(&format!("; read {}", request.readings.join(", ")));
        }
        prompt.push('\n');
    }
    prompt
}

/// First text block of a successful reply.
async fn reply_text(response: reqwest::Response) -> Result<String, CommentaryError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<AnthropicError>(&body)
            .map_or(body, |e| e.error.message);
        return Err(CommentaryError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let response: AnthropicResponse =
        serde_json::from_str(&body).map_err(|e| CommentaryError::Parse(e.to_string()))?;
    response
        .content
        .into_iter()
        .find(|c| c.content_type == "text")
        .and_then(|c| c.text)
        .ok_or_else(|| CommentaryError::Parse("reply has no text block".into()))
}

/// Pull the JSON object out of the model's text, keeping only notes for
/// characters that were asked about.
fn parse_commentary(
    text: &str,
    requests: &[CommentaryRequest],
) -> Result<CommentaryMap, CommentaryError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(CommentaryError::Parse("no JSON object in reply".into()));
    };
    if end < start {
        return Err(CommentaryError::Parse("no JSON object in reply".into()));
    }

    let notes: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&text[start..=end]).map_err(|e| CommentaryError::Parse(e.to_string()))?;
    let wanted: HashSet<&str> = requests.iter().map(|r| r.characters.as_str()).collect();

    Ok(notes
        .into_iter()
        .filter(|(key, _)| wanted.contains(key.as_str()))
        .filter_map(|(key, value)| {
            let note = value.as_str()?.trim();
            (!note.is_empty()).then(|| (key, note.to_string()))
        })
        .collect())
}
