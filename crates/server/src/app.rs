//! Axum app: state, router and route handlers.
//!
//! - `GET /api/data` returns the dataset exactly as loaded.
//! - `POST /api/ai` forwards `{"question": ...}` and returns `{"answer": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use salesqa_core::{AppConfig, AppResult, Dataset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::qa::Forwarder;
use crate::response::ApiError;

/// Shared state for the HTTP server.
///
/// Built once by the composition root and injected into every handler.
pub struct AppState {
    /// The immutable dataset.
    pub dataset: Dataset,
    /// Forwards questions to the completion service.
    pub forwarder: Forwarder,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Assemble state from explicit parts.
    pub fn new(dataset: Dataset, forwarder: Forwarder, cors_origins: Vec<String>) -> Self {
        Self {
            dataset,
            forwarder,
            cors_origins,
        }
    }

    /// Load the dataset and build the forwarder described by `config`.
    ///
    /// A missing or malformed dataset file is an error; the caller is
    /// expected to abort startup.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let dataset = Dataset::load(&config.data_file)?;
        let forwarder = Forwarder::from_config(config)?;
        Ok(Self::new(dataset, forwarder, config.cors_origins.clone()))
    }
}

/// `POST /api/ai` request body.
#[derive(Debug, Deserialize)]
pub struct AiRequest {
    pub question: String,
}

/// `POST /api/ai` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct AiResponse {
    pub answer: String,
}

/// Builds the router with both API routes, request tracing and CORS.
///
/// Request bodies are not size-limited.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/ai", post(ask))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// CORS for the configured origins, with credentials. Methods and headers
/// are mirrored from the preflight request.
///
/// A `*` entry allows any origin. The request origin is echoed back, since a
/// literal wildcard cannot be combined with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origin_values(origins))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

fn origin_values(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect()
}

/// Handles `GET /api/data`.
///
/// Writes the canonical text directly so the body is byte-identical to the
/// dataset embedded in prompts.
async fn get_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.dataset.canonical_text(),
    )
}

/// Handles `POST /api/ai`.
async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<AiResponse>, ApiError> {
    let Json(request) = payload?;

    let answer = state
        .forwarder
        .answer(&request.question, &state.dataset)
        .await?;

    Ok(Json(AiResponse { answer }))
}
