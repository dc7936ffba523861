use std::time::Duration;

/// Core trait for text-generation providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate completion for a given prompt
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Name of the credential variable when it was not configured.
    /// Callers check this before issuing any request.
    fn missing_credential(&self) -> Option<&str>;
}

/// Request structure for LLM generation
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

/// Response from LLM generation
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

/// Token usage metadata
#[derive(Debug, Clone, Default)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),
    #[error("LLM HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("LLM API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse LLM response: {0}")]
    Decode(String),
    #[error("LLM response has no choices")]
    NoChoices,
}

pub mod remote;
