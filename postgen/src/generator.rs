use anyhow::Result;
use common::{Config, Credentials};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::llm::remote::RemoteLlmProvider;
use crate::llm::{LlmProvider, LlmRequest};
use crate::news::{NewsError, NewsFetcher};
use crate::prompt::build_prompt;

/// Sampling parameters for the single generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: usize,
    pub temperature: f32,
}

impl From<&common::LlmConfig> for GenerationParams {
    fn from(config: &common::LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// News fetch, prompt assembly and one generation call, wired once at startup.
pub struct PostGenerator {
    news: NewsFetcher,
    llm: Arc<dyn LlmProvider>,
    params: GenerationParams,
}

impl PostGenerator {
    pub fn new(news: NewsFetcher, llm: Arc<dyn LlmProvider>, params: GenerationParams) -> Self {
        Self { news, llm, params }
    }

    /// Wire the remote providers from configuration and the startup credentials.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let news = NewsFetcher::new(&config.news, credentials.news_api_key.clone())?;
        let llm = RemoteLlmProvider::from_config(&config.llm, credentials.llm_api_key.clone());
        info!(
            model = %config.llm.model,
            api_url = %config.llm.api_url,
            news_mode = ?config.news.failure_mode,
            "post generator initialized"
        );
        Ok(Self::new(news, Arc::new(llm), GenerationParams::from(&config.llm)))
    }

    /// Headlines for `topic` using the configured limit.
    pub async fn headlines(&self, topic: &str) -> Result<Vec<String>, NewsError> {
        self.news.fetch_headlines(topic, self.news.default_limit()).await
    }

    /// Generate the post text for `topic`.
    ///
    /// Fails with `Config` before any network call when the generation credential is
    /// missing, and with `EmptyResponse` when the model returns blank text.
    pub async fn generate_post_text(&self, topic: &str) -> Result<String, GenerationError> {
        if let Some(variable) = self.llm.missing_credential() {
            return Err(GenerationError::Config(format!("{} не задан", variable)));
        }

        let headlines = self.headlines(topic).await?;
        let prompt = build_prompt(topic, &headlines);

        let response = self
            .llm
            .generate(LlmRequest {
                prompt,
                max_tokens: Some(self.params.max_tokens),
                temperature: Some(self.params.temperature),
                timeout_seconds: None,
            })
            .await?;

        let text = response.content.trim();
        if text.is_empty() {
            warn!(topic = %topic, model = %response.model, "model returned blank text");
            return Err(GenerationError::EmptyResponse("Пустой ответ от модели".to_string()));
        }

        info!(
            topic = %topic,
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "post generated"
        );
        Ok(text.to_string())
    }
}
