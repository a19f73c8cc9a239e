use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{GreetingError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "greeting.toml";
pub const CONFIG_PATH_ENV: &str = "GREETING_CONFIG_PATH";
pub const API_KEY_ENVS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_FALLBACK: &str = "Wishing you a season filled with light and wonder!";

/// Remote greeting settings, read from TOML. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_ms: u64,
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Hard cap applied to the returned text, counted in whitespace-separated words.
    pub max_words: usize,
    /// Returned when the service answers without any text.
    pub fallback: String,
    /// Never read from the file; see [`GreetingConfig::with_env_api_key`].
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout_ms: 8_000,
            max_output_tokens: 100,
            temperature: 1.2,
            max_words: 30,
            fallback: DEFAULT_FALLBACK.to_string(),
            api_key: None,
        }
    }
}

impl GreetingConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| GreetingError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| GreetingError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Loads `GREETING_CONFIG_PATH` (or `greeting.toml`), falling back to
    /// defaults when the file is absent, then picks up the API key from the
    /// environment or a `.env` file.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config = if Path::new(&path).exists() {
            log::debug!("Loading greeting config from '{}'", path);
            Self::load_from_file(&path)?
        } else {
            log::debug!("No greeting config at '{}', using defaults", path);
            Self::default()
        };

        Ok(config.with_env_api_key())
    }

    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = API_KEY_ENVS
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .filter(|key| !key.trim().is_empty());
        }
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}
