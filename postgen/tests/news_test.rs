mod support;

use common::{NewsConfig, NewsFailureMode};
use mockito::Matcher;
use postgen::news::{NewsError, NewsFetcher, NO_NEWS_PLACEHOLDER};

use support::{news_body, silent_endpoint, NEWS_PATH};

fn news_config(base: &str, mode: NewsFailureMode) -> NewsConfig {
    NewsConfig {
        api_url: format!("{}{}", base, NEWS_PATH),
        failure_mode: mode,
        ..NewsConfig::default()
    }
}

fn fetcher(base: &str, mode: NewsFailureMode, key: Option<&str>) -> NewsFetcher {
    NewsFetcher::new(&news_config(base, mode), key.map(str::to_string)).expect("build fetcher")
}

#[tokio::test]
async fn sends_language_keywords_and_key() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", NEWS_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("language".into(), "en".into()),
            Matcher::UrlEncoded("keywords".into(), "diesel generator".into()),
            Matcher::UrlEncoded("apiKey".into(), "news-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(news_body(&["  Cummins recalls gensets  ", "Fuel prices climb"]))
        .expect(1)
        .create_async()
        .await;

    let headlines = fetcher(&server.url(), NewsFailureMode::Soft, Some("news-key"))
        .fetch_headlines("diesel generator", 5)
        .await
        .expect("soft mode never fails");

    assert_eq!(headlines, vec!["Cummins recalls gensets", "Fuel prices climb"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn caps_to_limit_and_skips_untitled_entries() {
    let mut server = mockito::Server::new_async().await;

    let body = serde_json::json!({
        "news": [
            { "title": "One" },
            { "description": "no title here" },
            { "title": "" },
            { "title": "Two" },
            { "title": "Three" },
            { "title": "Four" }
        ]
    })
    .to_string();

    let _mock = server
        .mock("GET", NEWS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let news = fetcher(&server.url(), NewsFailureMode::Soft, Some("k"));

    let headlines = news.fetch_headlines("x", 3).await.expect("ok");
    assert_eq!(headlines, vec!["One", "Two", "Three"]);

    // fewer titled entries than the limit
    let headlines = news.fetch_headlines("x", 10).await.expect("ok");
    assert_eq!(headlines.len(), 4);
}

#[tokio::test]
async fn zero_limit_still_returns_one_headline() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", NEWS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(news_body(&["A", "B"]))
        .create_async()
        .await;

    let headlines = fetcher(&server.url(), NewsFailureMode::Soft, Some("k"))
        .fetch_headlines("x", 0)
        .await
        .expect("ok");
    assert_eq!(headlines, vec!["A"]);
}

#[tokio::test]
async fn soft_mode_turns_failures_into_placeholders() {
    let cases: Vec<(usize, &str, String)> = vec![
        (500, "oops", "(Currents недоступен: 500)".to_string()),
        (401, r#"{"status":"error"}"#, "(Currents недоступен: 401)".to_string()),
        (200, "not json at all", "(Currents вернул некорректный ответ)".to_string()),
        (200, r#"{"status":"ok","news":[]}"#, NO_NEWS_PLACEHOLDER.to_string()),
        (200, r#"{"status":"ok"}"#, NO_NEWS_PLACEHOLDER.to_string()),
    ];

    for (status, body, expected) in cases {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", NEWS_PATH)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let headlines = fetcher(&server.url(), NewsFailureMode::Soft, Some("k"))
            .fetch_headlines("topic", 5)
            .await
            .expect("soft mode never fails");
        assert_eq!(headlines, vec![expected], "status {} body {}", status, body);
    }
}

#[tokio::test]
async fn soft_mode_timeout_becomes_placeholder() {
    let base = silent_endpoint().await;
    let config = NewsConfig {
        timeout_seconds: 1,
        ..news_config(&base, NewsFailureMode::Soft)
    };

    let headlines = NewsFetcher::new(&config, Some("k".to_string()))
        .expect("build fetcher")
        .fetch_headlines("slow", 5)
        .await
        .expect("soft mode never fails");

    assert_eq!(headlines, vec!["(Currents недоступен: таймаут)"]);
}

#[tokio::test]
async fn unreachable_provider_becomes_placeholder() {
    // nothing listens on port 1
    let headlines = fetcher("http://127.0.0.1:1", NewsFailureMode::Soft, Some("k"))
        .fetch_headlines("x", 5)
        .await
        .expect("soft mode never fails");

    assert_eq!(headlines, vec!["(Currents недоступен: ошибка сети)"]);
}

#[tokio::test]
async fn missing_key_skips_the_call_in_both_modes() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", NEWS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    for mode in [NewsFailureMode::Soft, NewsFailureMode::Strict] {
        let headlines = fetcher(&server.url(), mode, None)
            .fetch_headlines("x", 5)
            .await
            .expect("missing key degrades");
        assert_eq!(headlines, vec!["(CURRENTS_API_KEY не задан: новости не загружены)"]);
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn strict_mode_surfaces_status_failures() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", NEWS_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let result = fetcher(&server.url(), NewsFailureMode::Strict, Some("k"))
        .fetch_headlines("x", 5)
        .await;

    assert!(matches!(result, Err(NewsError::Status(503))));
}

#[tokio::test]
async fn strict_mode_surfaces_network_failures() {
    let result = fetcher("http://127.0.0.1:1", NewsFailureMode::Strict, Some("k"))
        .fetch_headlines("x", 5)
        .await;

    assert!(matches!(result, Err(NewsError::Network(_))));
}

#[tokio::test]
async fn network_failures_never_expose_the_key() {
    for mode in [NewsFailureMode::Soft, NewsFailureMode::Strict] {
        let outcome = match fetcher("http://127.0.0.1:1", mode, Some("SECRET-NEWS-KEY"))
            .fetch_headlines("x", 5)
            .await
        {
            Ok(headlines) => headlines.join("\n"),
            Err(err) => err.to_string(),
        };
        assert!(!outcome.contains("SECRET-NEWS-KEY"), "{:?}: {}", mode, outcome);
    }
}
