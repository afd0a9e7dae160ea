//! HTTP surface of the embedding service.
//!
//! [`router`] mounts `/health`, `/model`, `/embeddings`, and `/similarity`
//! over a shared [`AppState`]. Pipeline failures become [`ApiError`], which
//! renders the `{error, message, timestamp}` payload with a matching status.

pub mod embeddings;
pub mod model;
pub mod similarity;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::pipeline::error::{PipelineError, ValidationError};
use crate::pipeline::EmbeddingService;

const ENDPOINTS: [&str; 4] = ["/health", "/model", "/embeddings", "/similarity"];

#[derive(Clone)]
pub struct AppState {
    pub service: EmbeddingService,
}

/// Build the router. `cors_origins` lists the browser origins allowed to call in.
pub fn router(state: AppState, cors_origins: &[String]) -> Result<Router> {
    let origins = cors_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(model::health))
        .route("/model", get(model::model_info))
        .route("/embeddings", post(embeddings::generate_embeddings))
        .route("/similarity", post(similarity::compute_similarity))
        .fallback(not_found)
        .layer(cors)
        .with_state(state))
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "not_found",
            "message": "Endpoint not found",
            "available_endpoints": ENDPOINTS,
        })),
    )
        .into_response()
}

/// Structured error payload returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug)]
pub struct ApiError(pub PipelineError);

impl<E> From<E> for ApiError
where
    E: Into<PipelineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ValidationError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match &err {
            PipelineError::Validation(_) | PipelineError::Similarity(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            PipelineError::Assembly(_) | PipelineError::Producer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(kind = err.kind(), error = %err, "request failed");
        } else if err.is_client_error() {
            tracing::warn!(kind = err.kind(), error = %err, "request rejected");
        }

        let index = match &err {
            PipelineError::Validation(v) => v.index(),
            _ => None,
        };
        let body = ErrorBody {
            error: err.kind(),
            message: err.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            index,
        };
        (status, Json(body)).into_response()
    }
}

/// Run a pipeline call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PipelineError::Producer(anyhow::anyhow!("embedding task failed: {e}")))?
        .map_err(ApiError)
}
