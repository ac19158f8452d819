//! Verification decision against a subject's stored embeddings.

use std::sync::Arc;

use facematch_core::{MatchOutcome, decide, validate_embedding, validate_subject_id};
use facematch_storage::Repository;

use crate::ServiceError;

/// Compares a query embedding with one subject's enrolled set.
///
/// Holds no state besides the repository handle and the threshold; every call
/// works on a fresh snapshot of the subject.
pub struct Matcher {
    repository: Arc<Repository>,
    threshold: f64,
}

impl Matcher {
    #[must_use]
    pub fn new(repository: Arc<Repository>, threshold: f64) -> Self {
        Self { repository, threshold }
    }

    /// Unknown subjects yield [`MatchOutcome::SubjectNotFound`], never
    /// `NoMatch`. The first stored vector at or above the threshold wins.
    pub async fn match_subject(
        &self,
        subject_id: &str,
        query: &[f32],
    ) -> Result<MatchOutcome, ServiceError> {
        validate_subject_id(subject_id)?;
        validate_embedding(0, query, self.repository.dimension())?;

        let Some(record) = self.repository.get(subject_id).await? else {
            tracing::info!(subject_id, "verification for unknown subject");
            return Ok(MatchOutcome::SubjectNotFound);
        };

        let outcome = decide(&record.embeddings, query, self.threshold);
        match &outcome {
            MatchOutcome::Match { similarity, matched_index } => {
                tracing::info!(subject_id, similarity, matched_index, "subject matched");
            },
            MatchOutcome::NoMatch { best_similarity } => {
                tracing::info!(
                    subject_id,
                    best_similarity,
                    threshold = self.threshold,
                    "subject did not match"
                );
            },
            MatchOutcome::SubjectNotFound => {},
        }
        Ok(outcome)
    }
}
