//! Text-generation backend configuration.

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat-completions backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the API (without the `/chat/completions` suffix).
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token. Usually supplied via `LICENSEGATE__GENERATION__API_KEY`.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}
