//! Enrollment: images in, one committed embedding set out.

use std::sync::Arc;

use facematch_core::{ValidationError, validate_embedding, validate_subject_id};
use facematch_embeddings::{ExtractionError, FeatureExtractor};
use facematch_storage::Repository;
use futures_util::future::join_all;

use crate::{EnrollmentReport, ImageFailure, ImageUpload, ServiceError, UploadArchive};

pub struct EnrollmentService {
    repository: Arc<Repository>,
    extractor: Arc<dyn FeatureExtractor>,
    archive: Option<UploadArchive>,
    max_payload_bytes: usize,
}

impl EnrollmentService {
    #[must_use]
    pub fn new(
        repository: Arc<Repository>,
        extractor: Arc<dyn FeatureExtractor>,
        max_payload_bytes: usize,
    ) -> Self {
        Self { repository, extractor, archive: None, max_payload_bytes }
    }

    #[must_use]
    pub fn with_archive(mut self, archive: UploadArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Extracts every image concurrently and replaces the subject's set with
    /// the embeddings that succeeded.
    ///
    /// Images that fail are listed in the report. When none succeed the call
    /// fails with [`ServiceError::NoUsableImages`] and nothing is written.
    pub async fn enroll(
        &self,
        subject_id: &str,
        images: Vec<ImageUpload>,
    ) -> Result<EnrollmentReport, ServiceError> {
        validate_subject_id(subject_id)?;
        if images.is_empty() {
            return Err(ValidationError::NoImages.into());
        }
        let total: usize = images.iter().map(|i| i.bytes.len()).sum();
        if total > self.max_payload_bytes {
            return Err(ValidationError::PayloadTooLarge {
                limit: self.max_payload_bytes,
                actual: total,
            }
            .into());
        }

        if let Some(archive) = &self.archive {
            join_all(images.iter().map(|i| archive.archive(subject_id, &i.name, &i.bytes))).await;
        }

        let dimension = self.repository.dimension();
        let results = join_all(images.iter().map(|i| self.extractor.extract(&i.bytes))).await;

        let mut embeddings = Vec::with_capacity(images.len());
        let mut failures = Vec::new();
        for (index, (image, result)) in images.iter().zip(results).enumerate() {
            match result {
                Ok(embedding) => match validate_embedding(index, &embedding, dimension) {
                    Ok(()) => embeddings.push(embedding),
                    Err(e) => failures.push(failure(index, image, e.to_string(), false)),
                },
                Err(e) => {
                    let retryable = is_service_failure(&e);
                    failures.push(failure(index, image, e.to_string(), retryable));
                },
            }
        }
        for f in &failures {
            tracing::warn!(
                subject_id,
                index = f.index,
                name = %f.name,
                "enrollment image rejected: {}",
                f.reason
            );
        }

        if embeddings.is_empty() {
            return Err(ServiceError::NoUsableImages(failures));
        }

        let record = self.repository.upsert(subject_id, embeddings).await?;
        Ok(EnrollmentReport {
            stored: record.embeddings.len(),
            subject_id: record.subject_id,
            failures,
            updated_at: record.updated_at,
        })
    }
}

fn is_service_failure(err: &ExtractionError) -> bool {
    err.is_transient() || matches!(err, ExtractionError::RetriesExhausted(_))
}

fn failure(index: usize, image: &ImageUpload, reason: String, retryable: bool) -> ImageFailure {
    ImageFailure { index, name: image.name.clone(), reason, retryable }
}
