use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use facematch_core::MatchOutcome;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::{CompareResponse, UploadResponse};
use crate::multipart::UploadForm;

/// `POST /upload`: enroll (or re-enroll) a subject from the `files` parts.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = UploadForm::read(multipart, "files").await?;
    let subject_id = form.require_subject_id()?.to_owned();
    if form.files.is_empty() {
        return Err(ApiError::BadRequest("no files selected for uploading".to_owned()));
    }

    let report = state.enrollment_service.enroll(&subject_id, form.files).await?;
    Ok(Json(UploadResponse { message: "files uploaded successfully", report }))
}

/// `POST /compare`: verify the single `file` part against a subject.
///
/// Match is 200, no match is 403, unknown subject is 404. All three carry the
/// same body shape tagged by `result`.
pub async fn compare(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = UploadForm::read(multipart, "file").await?;
    let subject_id = form.require_subject_id()?.to_owned();
    if form.files.len() > 1 {
        return Err(ApiError::BadRequest("exactly one file must be submitted".to_owned()));
    }
    let Some(image) = form.files.pop() else {
        return Err(ApiError::BadRequest("no file selected for comparison".to_owned()));
    };

    let outcome = state.verification_service.verify(&subject_id, image).await?;
    let (status, message) = match outcome {
        MatchOutcome::Match { .. } => (StatusCode::OK, "the faces match"),
        MatchOutcome::NoMatch { .. } => (StatusCode::FORBIDDEN, "the faces do not match"),
        MatchOutcome::SubjectNotFound => (StatusCode::NOT_FOUND, "subject not found"),
    };
    Ok((status, Json(CompareResponse { subject_id, message, outcome })).into_response())
}
