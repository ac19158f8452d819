//! Validating front of the storage engines.
//!
//! Every write is checked against the configured embedding dimension before it
//! reaches a backend, so no engine ever holds a record that breaks the
//! subject-record invariants.

use facematch_core::{SubjectRecord, validate_embeddings, validate_subject_id};

use crate::backend::StorageBackend;
use crate::error::StorageError;
use crate::traits::SubjectStore;

#[derive(Clone, Debug)]
pub struct Repository {
    backend: StorageBackend,
    dimension: usize,
}

impl Repository {
    #[must_use]
    pub fn new(backend: StorageBackend, dimension: usize) -> Self {
        Self { backend, dimension }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub const fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Most recently committed record for `subject_id`. `Ok(None)` means the
    /// subject was never enrolled.
    ///
    /// # Errors
    /// `Validation` for a blank id, `DataCorruption` when the stored vectors do
    /// not have the configured dimension, otherwise backend failures.
    pub async fn get(&self, subject_id: &str) -> Result<Option<SubjectRecord>, StorageError> {
        validate_subject_id(subject_id)?;
        let Some(record) = self.backend.get_subject(subject_id).await? else {
            return Ok(None);
        };
        if let Some(bad) = record.embeddings.iter().find(|e| e.len() != self.dimension) {
            return Err(StorageError::DataCorruption {
                context: format!("stored embeddings of subject {subject_id} have the wrong size"),
                source: format!(
                    "stored dimension {} differs from configured dimension {}",
                    bad.len(),
                    self.dimension
                )
                .into(),
            });
        }
        Ok(Some(record))
    }

    /// Creates the subject or replaces its entire embedding set.
    ///
    /// # Errors
    /// `Validation` (nothing written) for a blank id, an empty set, a vector of
    /// the wrong dimension or a non-finite component; otherwise backend failures.
    pub async fn upsert(
        &self,
        subject_id: &str,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<SubjectRecord, StorageError> {
        validate_subject_id(subject_id)?;
        validate_embeddings(&embeddings, self.dimension)?;
        let record = self.backend.upsert_subject(subject_id, embeddings).await?;
        tracing::info!(
            subject_id,
            embeddings = record.embeddings.len(),
            backend = self.backend.kind(),
            "subject embeddings stored"
        );
        Ok(record)
    }

    pub async fn count(&self) -> Result<u64, StorageError> {
        self.backend.count_subjects().await
    }
}
