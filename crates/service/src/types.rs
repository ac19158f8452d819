//! Request and report types shared by the enrollment and verification flows.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One uploaded image as received from the transport layer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, used for archiving and failure reports only.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

/// Why a single enrollment image produced no embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFailure {
    pub index: usize,
    pub name: String,
    pub reason: String,
    /// The extractor failed as a service rather than refusing the image.
    #[serde(skip)]
    pub retryable: bool,
}

/// Outcome of a committed enrollment.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentReport {
    pub subject_id: String,
    /// Number of embeddings now stored for the subject.
    pub stored: usize,
    pub failures: Vec<ImageFailure>,
    pub updated_at: DateTime<Utc>,
}

/// Stored-state overview of one subject, without the vectors themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub subject_id: String,
    pub embeddings: usize,
    pub dimension: usize,
    pub updated_at: DateTime<Utc>,
}
