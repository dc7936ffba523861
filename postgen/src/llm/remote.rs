use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{LlmError, LlmProvider, LlmRequest, LlmResponse, UsageMetadata};

/// Longest slice of a provider error body kept in `LlmError::Api`.
pub const MAX_ERROR_BODY_CHARS: usize = 300;

/// Remote LLM provider using OpenAI-compatible HTTP API
pub struct RemoteLlmProvider {
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    model: String,
    default_timeout: Duration,
    default_max_tokens: usize,
    default_temperature: f32,
    client: reqwest::Client,
}

impl RemoteLlmProvider {
    /// `api_key` is `None` when the variable named by `api_key_env` was unset at startup.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            api_key_env: api_key_env.into(),
            model: model.into(),
            default_timeout: Duration::from_secs(30),
            default_max_tokens: 500,
            default_temperature: 0.5,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &common::LlmConfig, api_key: Option<String>) -> Self {
        Self::new(&config.api_url, api_key, &config.api_key_env, &config.model).with_defaults(
            config.timeout_seconds,
            config.max_tokens,
            config.temperature,
        )
    }

    pub fn with_defaults(
        mut self,
        timeout_secs: u64,
        max_tokens: usize,
        temperature: f32,
    ) -> Self {
        self.default_timeout = Duration::from_secs(timeout_secs);
        self.default_max_tokens = max_tokens;
        self.default_temperature = temperature;
        self
    }
}

#[async_trait::async_trait]
impl LlmProvider for RemoteLlmProvider {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let timeout = request
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let max_tokens = request.max_tokens.unwrap_or(self.default_max_tokens);
        let temperature = request.temperature.unwrap_or(self.default_temperature);

        // Single-turn OpenAI-compatible request
        let req_body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: Some(request.prompt),
            }],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        };

        let api_key = self.api_key.as_deref().unwrap_or_default();

        let exchange = async {
            let response = self
                .client
                .post(&self.base_url)
                .bearer_auth(api_key)
                .json(&req_body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str::<OpenAiResponse>(&body).map_err(|e| LlmError::Decode(e.to_string()))
        };

        let resp_body = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| LlmError::Timeout(timeout))??;

        let choice = resp_body.choices.into_iter().next().ok_or(LlmError::NoChoices)?;

        let usage = resp_body
            .usage
            .map(|u| UsageMetadata {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
                total_tokens: u.total_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        debug!(total_tokens = usage.total_tokens, "LLM completion received");

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: resp_body.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    fn missing_credential(&self) -> Option<&str> {
        match self.api_key {
            Some(_) => None,
            None => Some(&self.api_key_env),
        }
    }
}

// OpenAI API request/response structures
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    // null when the model refuses or returns tool calls only
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<usize>,
    #[serde(default)]
    completion_tokens: Option<usize>,
    #[serde(default)]
    total_tokens: Option<usize>,
}
