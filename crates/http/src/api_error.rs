//! Typed API error for HTTP handlers.
//!
//! Converts service errors into HTTP responses with a JSON body. A failed
//! comparison is not an error; see `handlers::faces::compare`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use facematch_embeddings::ExtractionError;
use facematch_service::{ImageFailure, ServiceError};
use facematch_storage::StorageError;

/// Converts to `{"error": "message"}`, plus `failures` for rejected uploads.
///
/// `Internal` logs the real error server-side and returns a static message.
#[derive(Debug)]
pub enum ApiError {
    /// 400: malformed request or invalid input.
    BadRequest(String),
    /// 404: requested resource doesn't exist.
    NotFound(String),
    /// 422: the extractor refused the image(s).
    UnprocessableEntity { message: String, failures: Vec<ImageFailure> },
    /// 500: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
    /// 503: storage or extractor unavailable; safe to retry.
    ServiceUnavailable { message: String, failures: Vec<ImageFailure> },
}

impl ApiError {
    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable { message: message.into(), failures: Vec::new() }
    }

    pub(crate) fn unprocessable(message: impl Into<String>) -> Self {
        Self::UnprocessableEntity { message: message.into(), failures: Vec::new() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, failures) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            Self::UnprocessableEntity { message, failures } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, failures)
            },
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned(), Vec::new())
            },
            Self::ServiceUnavailable { message, failures } => {
                (StatusCode::SERVICE_UNAVAILABLE, message, failures)
            },
        };
        let body = if failures.is_empty() {
            serde_json::json!({"error": message})
        } else {
            serde_json::json!({"error": message, "failures": failures})
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => Self::BadRequest(e.to_string()),
            ServiceError::Storage(StorageError::Validation(e)) => Self::BadRequest(e.to_string()),
            ServiceError::Storage(e @ StorageError::DataCorruption { .. }) => {
                Self::Internal(anyhow::Error::new(e))
            },
            ServiceError::Storage(e) => {
                tracing::warn!(error = %e, "storage unavailable");
                Self::unavailable("storage temporarily unavailable, retry later")
            },
            ServiceError::Extraction(e) if e.is_image_rejection() => {
                Self::unprocessable(format!("could not extract a face embedding: {e}"))
            },
            ServiceError::Extraction(
                e @ (ExtractionError::JsonParse { .. } | ExtractionError::ClientInit(_)),
            ) => Self::Internal(anyhow::Error::new(e)),
            ServiceError::Extraction(e) => {
                tracing::warn!(error = %e, "feature extractor unavailable");
                Self::unavailable("feature extractor temporarily unavailable, retry later")
            },
            ServiceError::NoUsableImages(failures) if failures.iter().all(|f| f.retryable) => {
                Self::ServiceUnavailable {
                    message: "feature extractor temporarily unavailable, retry later".to_owned(),
                    failures,
                }
            },
            ServiceError::NoUsableImages(failures) => Self::UnprocessableEntity {
                message: "no valid images found for uploading".to_owned(),
                failures,
            },
        }
    }
}
