use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{run_blocking, ApiError, AppState};
use crate::embedding::NotReady;
use crate::pipeline::error::ValidationError;
use crate::pipeline::types::{default_normalize, EmbeddingRequest, EmbeddingResponse};

/// Wire shape of `POST /embeddings`. `texts` stays untyped so a non-string
/// element can be reported by index instead of failing the whole decode.
#[derive(Debug, Deserialize)]
pub struct EmbeddingsBody {
    pub texts: Vec<serde_json::Value>,
    #[serde(default = "default_normalize")]
    pub normalize: bool,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

pub async fn generate_embeddings(
    State(state): State<AppState>,
    body: Result<Json<EmbeddingsBody>, JsonRejection>,
) -> Result<Json<EmbeddingResponse>, ApiError> {
    // Readiness is reported ahead of any body problem.
    if !state.service.is_ready() {
        return Err(NotReady.into());
    }

    let Json(body) = body.map_err(ValidationError::from)?;
    let texts = state.service.normalizer().coerce(body.texts)?;
    let request = EmbeddingRequest {
        texts,
        normalize: body.normalize,
        batch_size: body.batch_size,
    };

    tracing::debug!(
        count = request.texts.len(),
        normalize = request.normalize,
        batch_size = ?request.batch_size,
        "embeddings request accepted"
    );

    let service = state.service.clone();
    let response = run_blocking(move || service.generate(request)).await?;
    Ok(Json(response))
}
