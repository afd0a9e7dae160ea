use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::{ApiError, AppState};
use crate::pipeline::error::ValidationError;
use crate::pipeline::types::{SimilarityRequest, SimilarityResult};

pub async fn compute_similarity(
    State(state): State<AppState>,
    body: Result<Json<SimilarityRequest>, JsonRejection>,
) -> Result<Json<SimilarityResult>, ApiError> {
    let Json(request) = body.map_err(ValidationError::from)?;
    let result = state.service.similarity(&request)?;
    Ok(Json(result))
}
