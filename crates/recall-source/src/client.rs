//! HTTP implementation of [`PageFetch`].

use std::time::Duration;

use recall_config::WaniKaniConfig;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::http::check_response;
use crate::paginate::{Page, PageFetch};
use crate::records::Collection;

/// Authenticated WaniKani v2 client.
pub struct WaniKaniClient {
    http: reqwest::Client,
    base_url: String,
}

impl WaniKaniClient {
    /// Build a client that sends the bearer token and API revision on
    /// every request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the token or revision is not a
    /// valid header value, or [`SourceError::Http`] if the underlying
    /// `reqwest::Client` fails to build.
    pub fn new(config: &WaniKaniConfig) -> Result<Self, SourceError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| SourceError::Config("API token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        let revision = HeaderValue::from_str(&config.revision)
            .map_err(|_| SourceError::Config("API revision is not a valid header value".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(HeaderName::from_static("wanikani-revision"), revision);

        let http = reqwest::Client::builder()
            .user_agent(concat!("recall/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_body(&self, url: &str) -> Result<String, SourceError> {
        let resp = check_response(self.http.get(url).send().await?).await?;
        Ok(resp.text().await?)
    }
}

impl PageFetch for WaniKaniClient {
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, SourceError> {
        let body = self.get_body(url).await?;
        let collection: Collection<T> = serde_json::from_str(&body)?;
        Ok(collection.into())
    }

    async fn fetch_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let body = self.get_body(url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WaniKaniApi;

    fn config(token: &str) -> WaniKaniConfig {
        WaniKaniConfig {
            api_token: token.to_string(),
            base_url: "https://api.wanikani.com/v2/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_with_valid_token() {
        let client = WaniKaniClient::new(&config("2da24e4a-ba89-4c4a-9047-d08f21e9dd01")).unwrap();
        assert_eq!(
            client.endpoint("/review_statistics"),
            "https://api.wanikani.com/v2/review_statistics"
        );
    }

    #[test]
    fn rejects_token_with_newline() {
        let result = WaniKaniClient::new(&config("abc\ndef"));
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[tokio::test]
    #[ignore] // requires network and RECALL_WANIKANI__API_TOKEN
    async fn live_user_lookup() {
        let token = std::env::var("RECALL_WANIKANI__API_TOKEN").unwrap_or_default();
        let client = WaniKaniClient::new(&config(&token)).unwrap();
        match client.user().await {
            Ok(user) => println!("user: {} (level {:?})", user.username, user.level),
            Err(e) => println!("user lookup failed: {e}"),
        }
    }
}
