use rocket::http::Status;

use crate::llm::LlmError;
use crate::news::NewsError;

/// Failure of the post generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A required credential is absent.
    #[error("{0}")]
    Config(String),
    /// Provider reachable but answered with a failure.
    #[error("{0}")]
    Upstream(String),
    /// Provider unreachable or timed out.
    #[error("{0}")]
    Network(String),
    /// Provider succeeded with unusable content.
    #[error("{0}")]
    EmptyResponse(String),
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Config(_) => "ConfigError",
            GenerationError::Upstream(_) => "UpstreamError",
            GenerationError::Network(_) => "NetworkError",
            GenerationError::EmptyResponse(_) => "EmptyResponseError",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            GenerationError::Config(_) | GenerationError::EmptyResponse(_) => Status::InternalServerError,
            GenerationError::Upstream(_) | GenerationError::Network(_) => Status::BadGateway,
        }
    }

    /// `"<Kind>: <message>"` with the message cut to 180 characters.
    pub fn fallback_reason(&self) -> String {
        let message: String = self.to_string().chars().take(180).collect();
        format!("{}: {}", self.kind(), message)
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(_) | LlmError::Transport(_) => GenerationError::Network(err.to_string()),
            LlmError::Api { .. } | LlmError::Decode(_) => GenerationError::Upstream(err.to_string()),
            LlmError::NoChoices => GenerationError::EmptyResponse(format!("Пустой ответ от модели ({})", err)),
        }
    }
}

impl From<NewsError> for GenerationError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::Status(_) | NewsError::Decode(_) => GenerationError::Upstream(err.to_string()),
            NewsError::Timeout | NewsError::Network(_) => GenerationError::Network(err.to_string()),
        }
    }
}
