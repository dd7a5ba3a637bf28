//! Text generation backend seam and an OpenAI-compatible client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use licensegate_core::config::GenerationConfig;
use licensegate_core::error::{AppError, ErrorKind};
use licensegate_core::result::AppResult;

/// Shortest reply a caller may ask for.
pub const MIN_REPLY_CHARS: usize = 50;
/// Longest reply a caller may ask for.
pub const MAX_REPLY_CHARS: usize = 500;
/// Reply length used when the caller gives none.
pub const DEFAULT_REPLY_CHARS: usize = 220;
/// Sampling temperature used when the caller gives none.
pub const DEFAULT_TEMPERATURE: f64 = 0.9;
/// Floor of the completion token budget.
const MIN_TOKEN_BUDGET: u32 = 32;
/// Returned when the backend answers with nothing usable.
const EMPTY_REPLY_FALLBACK: &str = "The generator returned an empty reply.";

/// A caller's generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Prompt forwarded verbatim to the backend.
    pub prompt: String,
    /// Requested reply length in characters.
    #[serde(default)]
    pub max_chars: Option<f64>,
    /// Requested sampling temperature.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl GenerationRequest {
    /// Reply length, rounded and clamped to `[50, 500]`.
    pub fn effective_max_chars(&self) -> usize {
        match self.max_chars {
            Some(n) if n.is_finite() => {
                n.round().clamp(MIN_REPLY_CHARS as f64, MAX_REPLY_CHARS as f64) as usize
            }
            _ => DEFAULT_REPLY_CHARS,
        }
    }

    /// Completion token budget, roughly four characters per token.
    pub fn token_budget(&self) -> u32 {
        let chars = self.effective_max_chars() as u32;
        chars.div_ceil(4).max(MIN_TOKEN_BUDGET)
    }

    /// Sampling temperature.
    pub fn effective_temperature(&self) -> f64 {
        self.temperature
            .filter(|t| t.is_finite())
            .unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Trims a raw backend reply and cuts it to `max_chars` characters.
pub fn finalize_reply(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return EMPTY_REPLY_FALLBACK.to_string();
    }
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    cut.trim_end().to_string()
}

/// Produces text for a prompt. The paid capability being metered.
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Generate a reply, already trimmed and length-limited.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl OpenAiGenerator {
    /// Build a client with the configured timeout.
    pub fn new(config: GenerationConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build generation client: {e}"),
                    e,
                )
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let max_chars = request.effective_max_chars();
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.effective_temperature(),
            max_tokens: request.token_budget(),
        };

        debug!(
            model = %self.config.model,
            max_chars,
            max_tokens = body.max_tokens,
            "Requesting completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Generation request failed");
                AppError::with_source(ErrorKind::ExternalService, "Generation backend unavailable", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Generation backend returned an error");
            return Err(AppError::external_service(format!(
                "Generation backend returned {status}"
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Malformed generation response",
                e,
            )
        })?;

        let raw = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(finalize_reply(&raw, max_chars))
    }
}
