/// LLM Client — the single point of entry for all Claude API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Pipelines depend on the `GenerationBackend` trait; `LlmClient` is the production impl.
///
/// One request per call. No retries, no backoff: a failure is classified and
/// surfaced immediately. Retry policy, if any, belongs to whoever wraps the pipeline.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model. Override with `LLM_MODEL`.
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
/// Low, near-deterministic sampling for ranking.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Anthropic returns 529 when the API is overloaded.
const OVERLOADED: u16 = 529;

/// Serializable discriminant of `LlmError`, for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ServiceUnavailable,
    AuthenticationFailed,
    RateLimited,
    MalformedBackendResponse,
    Unknown,
}

impl FailureKind {
    /// Failures that clear on their own (overload, throttling) rather than needing an operator.
    pub fn is_transient(self) -> bool {
        matches!(self, FailureKind::ServiceUnavailable | FailureKind::RateLimited)
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Generation service rejected credentials: {0}")]
    AuthenticationFailed(String),

    #[error("Generation service rate limited the request: {0}")]
    RateLimited(String),

    #[error("Malformed response from generation service: {0}")]
    MalformedBackendResponse(String),

    #[error("Generation service call failed: {0}")]
    Unknown(String),
}

impl LlmError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LlmError::ServiceUnavailable(_) => FailureKind::ServiceUnavailable,
            LlmError::AuthenticationFailed(_) => FailureKind::AuthenticationFailed,
            LlmError::RateLimited(_) => FailureKind::RateLimited,
            LlmError::MalformedBackendResponse(_) => FailureKind::MalformedBackendResponse,
            LlmError::Unknown(_) => FailureKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            LlmError::ServiceUnavailable(e.to_string())
        } else if e.is_decode() {
            LlmError::MalformedBackendResponse(e.to_string())
        } else {
            LlmError::Unknown(e.to_string())
        }
    }
}

/// Maps a non-success HTTP status to the failure taxonomy.
pub fn classify_status(status: StatusCode, message: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed(message),
        429 => LlmError::RateLimited(message),
        OVERLOADED => LlmError::ServiceUnavailable(message),
        _ if status.is_server_error() => LlmError::ServiceUnavailable(message),
        _ => LlmError::Unknown(format!("status {status}: {message}")),
    }
}

/// Fixed, versionable request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system: prompts::LEGAL_STAFFING_SYSTEM.to_string(),
        }
    }
}

/// A text-generation service. Carried as `Arc<dyn GenerationBackend>` so tests can
/// substitute a stub without touching the pipeline.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Sends `prompt` verbatim and returns the raw generated text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The production generation backend: the Anthropic Messages API.
/// Constructed once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    settings: GenerationSettings,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        api_url: String,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Unknown(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            api_url,
            settings,
        })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> AnthropicRequest<'a> {
        AnthropicRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            system: &self.settings.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    /// Makes one call to the Claude API, returning the full response object.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(classify_status(status, message));
        }

        let body = response.text().await?;
        let llm_response: LlmResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedBackendResponse(e.to_string()))?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl GenerationBackend for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        response.text().map(str::to_string).ok_or_else(|| {
            LlmError::MalformedBackendResponse("response contained no text block".to_string())
        })
    }
}
