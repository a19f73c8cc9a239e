use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::config::GreetingConfig;
use crate::error::{GreetingError, Result};
use crate::gemini::{GenerateRequest, GenerateResponse, cap_words};

pub type GreetingFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Anything that can produce a greeting for a theme.
///
/// Implementations never fail: an empty string means "nothing to show".
pub trait GreetingSource: Send + Sync {
    fn request_greeting<'a>(&'a self, theme: &'a str) -> GreetingFuture<'a>;
}

/// Fixed text, used offline and when remote generation is disabled.
#[derive(Debug, Clone, Default)]
pub struct StaticGreeting(pub String);

impl GreetingSource for StaticGreeting {
    fn request_greeting<'a>(&'a self, _theme: &'a str) -> GreetingFuture<'a> {
        let text = self.0.clone();
        Box::pin(async move { text })
    }
}

/// Generates greetings through the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GreetingClient {
    http: reqwest::Client,
    config: GreetingConfig,
}

impl GreetingClient {
    pub fn new(config: GreetingConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    /// One round trip. `Ok(None)` means the service answered without text.
    pub async fn fetch_text(&self, theme: &str) -> Result<Option<String>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GreetingError::MissingApiKey)?;

        let response = self
            .http
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::new(theme, &self.config))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(GreetingError::Status { status, body });
        }

        let body = response.bytes().await?;
        decode_text(&body)
    }

    /// Maps a fetch outcome to display text.
    pub fn resolve(&self, outcome: Result<Option<String>>) -> String {
        match outcome {
            Ok(Some(text)) => cap_words(&text, self.config.max_words),
            Ok(None) => cap_words(&self.config.fallback, self.config.max_words),
            Err(e) => {
                log::error!("Greeting request failed: {}", e);
                String::new()
            }
        }
    }
}

/// Decodes a `generateContent` body into its greeting text.
pub fn decode_text(body: &[u8]) -> Result<Option<String>> {
    let payload: GenerateResponse = serde_json::from_slice(body)?;
    Ok(payload.text())
}

impl GreetingSource for GreetingClient {
    fn request_greeting<'a>(&'a self, theme: &'a str) -> GreetingFuture<'a> {
        Box::pin(async move {
            let outcome = self.fetch_text(theme).await;
            self.resolve(outcome)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FALLBACK;

    fn client() -> GreetingClient {
        GreetingClient::new(GreetingConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_text_is_capped() {
        let long = vec!["joy"; 50].join(" ");
        let text = client().resolve(Ok(Some(long)));
        assert_eq!(text.split_whitespace().count(), 30);
    }

    #[test]
    fn test_resolve_missing_text_uses_fallback() {
        assert_eq!(client().resolve(Ok(None)), DEFAULT_FALLBACK);
    }

    #[test]
    fn test_decode_text_reads_first_candidate() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":" Bright nights. "}]}}]}"#;
        assert_eq!(decode_text(body).unwrap().as_deref(), Some("Bright nights."));
        assert_eq!(decode_text(br#"{"candidates":[]}"#).unwrap(), None);
    }

    #[test]
    fn test_decode_text_malformed_body_is_serialization_error() {
        let outcome = decode_text(b"{\"candidates\": [");
        assert!(matches!(outcome, Err(GreetingError::Serialization(_))));
        assert_eq!(client().resolve(outcome), "");
    }

    #[test]
    fn test_resolve_error_is_empty() {
        assert_eq!(client().resolve(Err(GreetingError::MissingApiKey)), "");
    }

    #[tokio::test]
    async fn test_missing_api_key_yields_empty_greeting() {
        let mut config = GreetingConfig::default();
        config.api_key = None;
        let client = GreetingClient::new(config).unwrap();

        assert!(matches!(
            client.fetch_text("Snow").await,
            Err(GreetingError::MissingApiKey)
        ));
        assert_eq!(client.request_greeting("Snow").await, "");
    }

    #[tokio::test]
    async fn test_static_greeting() {
        let source = StaticGreeting("Season's greetings".to_string());
        assert_eq!(source.request_greeting("any").await, "Season's greetings");
    }
}
