use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Persisted embedding set of one enrolled subject.
///
/// Invariant: `embeddings` is non-empty and every vector has the store's
/// configured dimension. Construct through the repository, which validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub subject_id: String,
    pub embeddings: Vec<Vec<f32>>,
    pub updated_at: DateTime<Utc>,
}

impl SubjectRecord {
    #[must_use]
    pub fn new(subject_id: String, embeddings: Vec<Vec<f32>>, updated_at: DateTime<Utc>) -> Self {
        Self { subject_id, embeddings, updated_at }
    }

    /// Dimension of the stored vectors (0 only for a record that violates the invariant).
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.embeddings.first().map_or(0, Vec::len)
    }
}

/// Subject ids are opaque; the only requirement is that they are not blank.
pub fn validate_subject_id(subject_id: &str) -> Result<(), ValidationError> {
    if subject_id.trim().is_empty() {
        return Err(ValidationError::EmptySubjectId);
    }
    Ok(())
}

/// Checks a single vector's length and that every component is finite.
pub fn validate_embedding(
    index: usize,
    embedding: &[f32],
    dimension: usize,
) -> Result<(), ValidationError> {
    if embedding.len() != dimension {
        return Err(ValidationError::DimensionMismatch {
            index,
            expected: dimension,
            actual: embedding.len(),
        });
    }
    if let Some(position) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite { index, position });
    }
    Ok(())
}

/// Checks a full embedding set before it is written.
pub fn validate_embeddings(
    embeddings: &[Vec<f32>],
    dimension: usize,
) -> Result<(), ValidationError> {
    if embeddings.is_empty() {
        return Err(ValidationError::EmptyEmbeddings);
    }
    for (index, embedding) in embeddings.iter().enumerate() {
        validate_embedding(index, embedding, dimension)?;
    }
    Ok(())
}
