/*!
common/src/lib.rs

Shared configuration types and helpers for postgen.

This file provides:
- Config data structures (deserialized from TOML, every field defaulted)
- An async loader merging a default file with an optional override file
- Credential resolution from the process environment
- Validation of the loaded values
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// HTTP listener configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g. "0.0.0.0")
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// How the news fetcher reacts to provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsFailureMode {
    /// Every failure becomes a placeholder headline.
    #[default]
    Soft,
    /// Provider failures are returned to the caller; a missing key still degrades.
    Strict,
}

/// How request handlers render a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationFailureMode {
    /// Always answer 200 with a deterministic fallback post.
    #[default]
    Fallback,
    /// Answer with the error status and a short detail message.
    Propagate,
}

/// News search provider (Currents-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
    pub limit: usize,
    pub language: String,
    pub failure_mode: NewsFailureMode,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.currentsapi.services/v1/search".to_string(),
            api_key_env: "CURRENTS_API_KEY".to_string(),
            timeout_seconds: 15,
            limit: 5,
            language: "en".to_string(),
            failure_mode: NewsFailureMode::Soft,
        }
    }
}

/// Remote LLM config (OpenAI-compatible chat completions endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key_env: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 30,
            max_tokens: 500,
            temperature: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub failure_mode: GenerationFailureMode,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub news: NewsConfig,
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Load configuration from a single TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// With neither present the built-in defaults are returned.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Reject values the services cannot run with. Missing credentials are not checked here.
    pub fn validate(&self) -> Result<()> {
        validate_endpoint("news.api_url", &self.news.api_url)?;
        validate_endpoint("llm.api_url", &self.llm.api_url)?;

        if self.news.limit == 0 {
            bail!("news.limit must be at least 1");
        }
        if self.news.timeout_seconds == 0 || self.llm.timeout_seconds == 0 {
            bail!("timeouts must be at least 1 second");
        }
        if self.llm.max_tokens == 0 {
            bail!("llm.max_tokens must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!("llm.temperature must be within 0.0..=2.0, got {}", self.llm.temperature);
        }
        Ok(())
    }

    /// Resolve both provider credentials once, logging presence but never values.
    pub fn resolve_credentials(&self) -> Credentials {
        let credentials = Credentials {
            news_api_key: env_value(&self.news.api_key_env),
            llm_api_key: env_value(&self.llm.api_key_env),
        };

        for (name, present) in [
            (&self.news.api_key_env, credentials.news_api_key.is_some()),
            (&self.llm.api_key_env, credentials.llm_api_key.is_some()),
        ] {
            if present {
                info!(variable = %name, "credential found");
            } else {
                warn!(variable = %name, "credential not set; dependent calls will degrade");
            }
        }

        credentials
    }
}

/// Provider credentials captured at startup.
#[derive(Clone, Default)]
pub struct Credentials {
    pub news_api_key: Option<String>,
    pub llm_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<set>"))
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// Read an environment variable, treating blank values as unset.
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_endpoint(field: &str, raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("{} is not a valid URL: {}", field, raw))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("{} must use http or https, got {}", field, other),
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
