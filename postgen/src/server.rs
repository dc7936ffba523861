use anyhow::{anyhow, Result};
use common::{Config, GenerationFailureMode};
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Build, Request, Rocket, State};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::fallback::build_fallback;
use crate::generator::PostGenerator;

/// Default topic for `/news-test`.
pub const NEWS_TEST_DEFAULT_TOPIC: &str = "diesel generator";
/// Default topic for `/generate` and `/generate-post`.
pub const GENERATE_DEFAULT_TOPIC: &str = "diesel generator troubleshooting";

/// Application state stored inside Rocket managed state.
pub struct AppState {
    pub generator: PostGenerator,
    pub failure_mode: GenerationFailureMode,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HeartbeatResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct NewsTestResponse {
    topic: String,
    count: usize,
    news: Vec<String>,
}

#[derive(Serialize)]
struct PostResponse {
    text: String,
}

/// Body of `POST /generate-post`.
#[derive(Deserialize)]
struct GeneratePostRequest {
    #[serde(default)]
    topic: Option<String>,
}

/// Error body, `{"detail": "..."}`.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

type ApiError = Custom<Json<ErrorBody>>;

fn api_error(status: Status, detail: impl Into<String>) -> ApiError {
    Custom(status, Json(ErrorBody { detail: detail.into() }))
}

/// Missing or blank topics fall back to `default`; anything else is used as given.
fn resolve_topic(raw: Option<&str>, default: &str) -> String {
    match raw {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => default.to_string(),
    }
}

#[get("/")]
async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Service is running",
    })
}

#[get("/heartbeat")]
async fn heartbeat() -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse { status: "OK" })
}

/// Show the headlines the generator would use for a topic.
#[get("/news-test?<topic>")]
async fn news_test(state: &State<AppState>, topic: Option<String>) -> Result<Json<NewsTestResponse>, ApiError> {
    let topic = resolve_topic(topic.as_deref(), NEWS_TEST_DEFAULT_TOPIC);

    let news = state.generator.headlines(&topic).await.map_err(|e| {
        error!(topic = %topic, error = %e, "news-test failed");
        api_error(Status::BadGateway, e.to_string())
    })?;

    Ok(Json(NewsTestResponse {
        topic,
        count: news.len(),
        news,
    }))
}

#[get("/generate?<topic>")]
async fn generate(state: &State<AppState>, topic: Option<String>) -> Result<Json<PostResponse>, ApiError> {
    let topic = resolve_topic(topic.as_deref(), GENERATE_DEFAULT_TOPIC);
    render_post(state, &topic).await
}

#[post("/generate-post", data = "<body>")]
async fn generate_post(
    state: &State<AppState>,
    body: Json<GeneratePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let topic = resolve_topic(body.topic.as_deref(), GENERATE_DEFAULT_TOPIC);
    render_post(state, &topic).await
}

/// Run the pipeline and render its outcome under the configured failure policy.
async fn render_post(state: &AppState, topic: &str) -> Result<Json<PostResponse>, ApiError> {
    match state.generator.generate_post_text(topic).await {
        Ok(text) => Ok(Json(PostResponse { text })),
        Err(err) => match state.failure_mode {
            GenerationFailureMode::Fallback => {
                let reason = err.fallback_reason();
                warn!(topic = %topic, kind = err.kind(), reason = %reason, "serving fallback post");
                Ok(Json(PostResponse {
                    text: build_fallback(topic, &reason),
                }))
            }
            GenerationFailureMode::Propagate => {
                error!(topic = %topic, kind = err.kind(), error = %err, "generation failed");
                Err(api_error(err.status(), err.to_string()))
            }
        },
    }
}

#[catch(400)]
fn bad_request(_req: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody {
        detail: "Bad request".to_string(),
    })
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody {
        detail: format!("Not found: {}", req.uri().path()),
    })
}

#[catch(422)]
fn unprocessable(_req: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody {
        detail: "Request body must be JSON like {\"topic\": \"...\"}".to_string(),
    })
}

#[catch(500)]
fn internal_error(_req: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody {
        detail: "Internal server error".to_string(),
    })
}

/// Assemble routes, catchers and managed state on top of `figment`.
pub fn build_rocket(state: AppState, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .mount("/", routes![index, heartbeat, news_test, generate, generate_post])
        .register("/", catchers![bad_request, not_found, unprocessable, internal_error])
}

/// Build providers from `config`, bind to `server.bind:server.port` and serve until shutdown.
pub async fn launch_rocket(config: &Config) -> Result<()> {
    let credentials = config.resolve_credentials();
    let generator = PostGenerator::from_config(config, &credentials)?;

    let state = AppState {
        generator,
        failure_mode: config.generation.failure_mode,
    };

    let figment = rocket::Config::figment()
        .merge(("address", config.server.bind.clone()))
        .merge(("port", config.server.port));

    info!(
        bind = %config.server.bind,
        port = config.server.port,
        policy = ?state.failure_mode,
        "Starting Rocket HTTP server"
    );
    build_rocket(state, figment)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    info!("Rocket HTTP server has shut down");
    Ok(())
}
