use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::api_types::SettingsResponse;

/// Effective runtime settings. Read-only: they are validated once at startup.
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        settings: state.settings.clone(),
        extractor_model: state.extractor_model.clone(),
        storage_backend: state.subject_service.backend_kind(),
    })
}
