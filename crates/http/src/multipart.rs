//! Multipart form collection for the upload endpoints.

use axum::extract::Multipart;
use facematch_service::ImageUpload;

use crate::api_error::ApiError;

/// Subject id field; `student_id` is still accepted from older clients.
const SUBJECT_FIELDS: [&str; 2] = ["subject_id", "student_id"];

#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub subject_id: Option<String>,
    pub files: Vec<ImageUpload>,
}

impl UploadForm {
    /// Reads every part. File parts are taken from `file_field`; a part with
    /// an empty file name is what a browser sends for an unselected input and
    /// is skipped.
    pub(crate) async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!("multipart parsing error: {e}");
            ApiError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
        })? {
            let name = field.name().unwrap_or_default().to_owned();
            if SUBJECT_FIELDS.contains(&name.as_str()) {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable {name}: {e}")))?;
                form.subject_id = Some(value.trim().to_owned());
            } else if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable file part: {e}")))?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.push(ImageUpload::new(file_name, bytes.to_vec()));
            } else {
                tracing::debug!(field = %name, "ignoring unknown multipart field");
            }
        }
        Ok(form)
    }

    pub(crate) fn require_subject_id(&self) -> Result<&str, ApiError> {
        match self.subject_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::BadRequest("no subject_id provided".to_owned())),
        }
    }
}
