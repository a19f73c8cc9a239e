//! Request and response bodies of the `generateContent` endpoint, plus the
//! text shaping applied to whatever comes back.

use serde::{Deserialize, Serialize};

use crate::config::GreetingConfig;

pub fn build_prompt(theme: &str) -> String {
    format!(
        "Write a short, warm, and magical 2-sentence holiday greeting card message. \
         Theme: {theme}. Keep it under 30 words. No emojis inside the text."
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateRequest {
    pub fn new(theme: &str, config: &GreetingConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(theme)),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: config.max_output_tokens,
                temperature: config.temperature,
            },
        }
    }
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, trimmed.
    /// `None` when there is no candidate or the text is blank.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Keeps at most `max_words` whitespace-separated words, rejoined with single spaces.
pub fn cap_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_theme() {
        let prompt = build_prompt("Luxury Gold and Emerald Christmas");
        assert!(prompt.contains("Theme: Luxury Gold and Emerald Christmas."));
        assert!(prompt.contains("under 30 words"));
        assert!(prompt.contains("No emojis"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest::new("Snow", &GreetingConfig::default());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["contents"][0]["parts"][0]["text"],
            serde_json::Value::String(build_prompt("Snow"))
        );
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 100);
        assert!((value["generationConfig"]["temperature"].as_f64().unwrap() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" May your "},{"text":"nights glow. "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("May your nights glow."));
    }

    #[test]
    fn test_response_without_text() {
        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);

        let no_content: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(no_content.text(), None);

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert_eq!(blank.text(), None);
    }

    #[test]
    fn test_cap_words() {
        let long = (0..40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let capped = cap_words(&long, 30);
        assert_eq!(capped.split(' ').count(), 30);
        assert!(capped.ends_with("w29"));

        assert_eq!(cap_words("Merry\n  and bright", 30), "Merry and bright");
        assert_eq!(cap_words("anything", 0), "");
    }
}
