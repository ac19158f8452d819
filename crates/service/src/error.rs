//! Typed error enum for the service layer.
//!
//! Unifies validation, storage and extraction failures so the HTTP and CLI
//! layers can map each one to its own response.

use facematch_core::ValidationError;
use facematch_embeddings::ExtractionError;
use facematch_storage::StorageError;
use thiserror::Error;

use crate::types::ImageFailure;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input rejected before any side effect.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Storage operation failed. Never retried here.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The single verification image could not be turned into an embedding.
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),

    /// Every enrollment image failed; nothing was committed.
    #[error("none of the {} submitted images produced an embedding", .0.len())]
    NoUsableImages(Vec<ImageFailure>),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying by the caller).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Extraction(e) => {
                e.is_transient() || matches!(e, ExtractionError::RetriesExhausted(_))
            },
            Self::NoUsableImages(failures) => {
                !failures.is_empty() && failures.iter().all(|f| f.retryable)
            },
            Self::Validation(_) => false,
        }
    }

    /// Whether the caller sent something unusable (bad input or an image the
    /// extractor refused), as opposed to a fault on our side.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Storage(e) => e.is_validation(),
            Self::Extraction(e) => e.is_image_rejection(),
            Self::NoUsableImages(_) => !self.is_transient(),
        }
    }
}

