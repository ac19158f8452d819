//! Storage backend trait abstraction.

use async_trait::async_trait;
use facematch_core::SubjectRecord;

use crate::error::StorageError;

/// Point-lookup store of subject records keyed by `subject_id`.
///
/// Implementations do not validate input; [`crate::Repository`] does that
/// before delegating here.
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Latest committed record for `subject_id`, if any.
    async fn get_subject(&self, subject_id: &str) -> Result<Option<SubjectRecord>, StorageError>;

    /// Creates the record or replaces its whole embedding set.
    ///
    /// Must be atomic per subject: a concurrent reader observes either the old
    /// set or the new one, never a mix.
    async fn upsert_subject(
        &self,
        subject_id: &str,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<SubjectRecord, StorageError>;

    /// Number of enrolled subjects.
    async fn count_subjects(&self) -> Result<u64, StorageError>;
}
