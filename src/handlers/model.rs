use axum::extract::State;
use axum::Json;

use super::{ApiError, AppState};
use crate::pipeline::types::{HealthReport, ModelInfo};

/// Liveness plus model readiness. Always 200; `status` says whether the model is up.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.service.health())
}

pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    Ok(Json(state.service.model_info()?))
}
