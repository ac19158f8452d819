use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use facematch_service::SubjectSummary;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::StatsResponse;

pub async fn get_subject(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<String>,
) -> Result<Json<SubjectSummary>, ApiError> {
    state
        .subject_service
        .summary(&subject_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("subject '{subject_id}' not found")))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let subjects = state.subject_service.count().await?;
    Ok(Json(StatsResponse { subjects, storage_backend: state.subject_service.backend_kind() }))
}
