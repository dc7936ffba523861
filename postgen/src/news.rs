use anyhow::{Context, Result};
use common::{NewsConfig, NewsFailureMode};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Failures surfaced by the news provider in strict mode.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Currents вернул статус {0}")]
    Status(u16),
    #[error("Currents не ответил вовремя")]
    Timeout,
    #[error("Currents недоступен: {0}")]
    Network(String),
    #[error("Currents вернул некорректный ответ: {0}")]
    Decode(String),
}

impl NewsError {
    /// Headline standing in for real news when the fetch failed in soft mode.
    pub fn placeholder(&self) -> String {
        match self {
            NewsError::Status(code) => format!("(Currents недоступен: {})", code),
            NewsError::Timeout => "(Currents недоступен: таймаут)".to_string(),
            NewsError::Network(_) => "(Currents недоступен: ошибка сети)".to_string(),
            NewsError::Decode(_) => "(Currents вернул некорректный ответ)".to_string(),
        }
    }
}

// The request URL carries the API key as a query parameter, so it is stripped here.
impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NewsError::Timeout
        } else {
            NewsError::Network(err.without_url().to_string())
        }
    }
}

/// Placeholder used when the provider answered but no entry carried a title.
pub const NO_NEWS_PLACEHOLDER: &str = "(Свежих новостей по теме не найдено)";

/// Fetches recent headlines for a topic from a Currents-compatible search API.
pub struct NewsFetcher {
    api_url: String,
    api_key: Option<String>,
    api_key_env: String,
    language: String,
    default_limit: usize,
    failure_mode: NewsFailureMode,
    client: Client,
}

impl NewsFetcher {
    /// Builds the HTTP client once; `api_key` is `None` when the credential was unset.
    pub fn new(config: &NewsConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("postgen/0.1.0")
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            language: config.language.clone(),
            default_limit: config.limit,
            failure_mode: config.failure_mode,
            client,
        })
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Returns at most `limit` trimmed titles, never an empty list.
    ///
    /// A missing credential always degrades to a placeholder. Provider failures
    /// degrade the same way in soft mode and are returned as errors in strict mode.
    pub async fn fetch_headlines(&self, topic: &str, limit: usize) -> Result<Vec<String>, NewsError> {
        let limit = limit.max(1);

        let Some(api_key) = self.api_key.as_deref() else {
            warn!(variable = %self.api_key_env, "news credential not set, skipping fetch");
            return Ok(vec![format!("({} не задан: новости не загружены)", self.api_key_env)]);
        };

        match self.search(topic, api_key).await {
            Ok(articles) => {
                let headlines = collect_titles(articles, limit);
                info!(topic = %topic, count = headlines.len(), "headlines fetched");
                Ok(headlines)
            }
            Err(err) => match self.failure_mode {
                NewsFailureMode::Soft => {
                    warn!(topic = %topic, error = %err, "news fetch failed, using placeholder");
                    Ok(vec![err.placeholder()])
                }
                NewsFailureMode::Strict => {
                    warn!(topic = %topic, error = %err, "news fetch failed");
                    Err(err)
                }
            },
        }
    }

    async fn search(&self, topic: &str, api_key: &str) -> Result<Vec<CurrentsArticle>, NewsError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("language", self.language.as_str()),
                ("keywords", topic),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: CurrentsResponse =
            serde_json::from_str(&body).map_err(|e| NewsError::Decode(e.to_string()))?;
        Ok(parsed.news)
    }
}

fn collect_titles(articles: Vec<CurrentsArticle>, limit: usize) -> Vec<String> {
    let titles: Vec<String> = articles
        .into_iter()
        .filter_map(|a| a.title)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(limit)
        .collect();

    if titles.is_empty() {
        vec![NO_NEWS_PLACEHOLDER.to_string()]
    } else {
        titles
    }
}

#[derive(Debug, Deserialize)]
struct CurrentsResponse {
    #[serde(default)]
    news: Vec<CurrentsArticle>,
}

#[derive(Debug, Deserialize)]
struct CurrentsArticle {
    #[serde(default)]
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: Option<&str>) -> CurrentsArticle {
        CurrentsArticle {
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn titles_are_trimmed_filtered_and_capped() {
        let articles = vec![
            article(Some("  First  ")),
            article(None),
            article(Some("   ")),
            article(Some("Second")),
            article(Some("Third")),
        ];

        let titles = collect_titles(articles, 2);
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn no_titled_entries_yield_placeholder() {
        let titles = collect_titles(vec![article(None), article(Some(""))], 5);
        assert_eq!(titles, vec![NO_NEWS_PLACEHOLDER]);
    }

    #[test]
    fn status_placeholder_names_the_code() {
        assert_eq!(NewsError::Status(500).placeholder(), "(Currents недоступен: 500)");
    }

    #[tokio::test]
    async fn network_errors_drop_the_request_url() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/v1/search?apiKey=SECRET-NEWS-KEY")
            .send()
            .await
            .expect_err("nothing listens on port 1");

        let err = NewsError::from(err);
        assert!(matches!(err, NewsError::Network(_)));
        assert!(!err.to_string().contains("SECRET-NEWS-KEY"));
        assert!(!err.to_string().contains("apiKey"));
    }
}
