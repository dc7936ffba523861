#![allow(dead_code)]

use common::{Config, Credentials, GenerationFailureMode, NewsFailureMode};
use tokio::net::TcpListener;

use postgen::generator::PostGenerator;
use postgen::server::AppState;

pub const NEWS_PATH: &str = "/v1/search";
pub const LLM_PATH: &str = "/v1/chat/completions";

/// Config pointing both providers at mock servers.
pub fn mock_config(news_base: &str, llm_base: &str) -> Config {
    let mut config = Config::default();
    config.news.api_url = format!("{}{}", news_base, NEWS_PATH);
    config.llm.api_url = format!("{}{}", llm_base, LLM_PATH);
    config
}

pub fn with_modes(mut config: Config, news: NewsFailureMode, generation: GenerationFailureMode) -> Config {
    config.news.failure_mode = news;
    config.generation.failure_mode = generation;
    config
}

pub fn credentials(news: Option<&str>, llm: Option<&str>) -> Credentials {
    Credentials {
        news_api_key: news.map(str::to_string),
        llm_api_key: llm.map(str::to_string),
    }
}

pub fn generator(config: &Config, credentials: &Credentials) -> PostGenerator {
    PostGenerator::from_config(config, credentials).expect("build generator")
}

pub fn app_state(config: &Config, credentials: &Credentials) -> AppState {
    AppState {
        generator: generator(config, credentials),
        failure_mode: config.generation.failure_mode,
    }
}

/// Currents-shaped body with the given titles.
pub fn news_body(titles: &[&str]) -> String {
    let news: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| serde_json::json!({ "id": "x", "title": t, "url": "https://example.com" }))
        .collect();
    serde_json::json!({ "status": "ok", "news": news }).to_string()
}

/// OpenAI-shaped completion body carrying `content`.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    })
    .to_string()
}

/// Base URL of a listener that accepts connections and never answers.
pub async fn silent_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}
