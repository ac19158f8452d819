use std::sync::Arc;

use facematch_core::{MatchOutcome, ValidationError, validate_subject_id};
use facematch_embeddings::FeatureExtractor;

use crate::{ImageUpload, Matcher, ServiceError, UploadArchive};

/// Verification: one image in, a [`MatchOutcome`] out. Extraction failures are
/// fatal here since there is nothing else to compare.
pub struct VerificationService {
    matcher: Arc<Matcher>,
    extractor: Arc<dyn FeatureExtractor>,
    archive: Option<UploadArchive>,
    max_payload_bytes: usize,
}

impl VerificationService {
    #[must_use]
    pub fn new(
        matcher: Arc<Matcher>,
        extractor: Arc<dyn FeatureExtractor>,
        max_payload_bytes: usize,
    ) -> Self {
        Self { matcher, extractor, archive: None, max_payload_bytes }
    }

    #[must_use]
    pub fn with_archive(mut self, archive: UploadArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    pub async fn verify(
        &self,
        subject_id: &str,
        image: ImageUpload,
    ) -> Result<MatchOutcome, ServiceError> {
        validate_subject_id(subject_id)?;
        if image.bytes.len() > self.max_payload_bytes {
            return Err(ValidationError::PayloadTooLarge {
                limit: self.max_payload_bytes,
                actual: image.bytes.len(),
            }
            .into());
        }
        if let Some(archive) = &self.archive {
            archive.archive(subject_id, &image.name, &image.bytes).await;
        }

        let query = self.extractor.extract(&image.bytes).await?;
        self.matcher.match_subject(subject_id, &query).await
    }
}
