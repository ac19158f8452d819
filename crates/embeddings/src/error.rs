//! Typed error enum for the embeddings crate.

use thiserror::Error;

/// Errors from face embedding extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("image payload is empty")]
    EmptyImage,
    #[error("no face detected in image")]
    NoFace,
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("all retries exhausted, last error: {0}")]
    RetriesExhausted(Box<ExtractionError>),
}

impl ExtractionError {
    /// Whether this error is transient and should be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(e) => !e.is_builder() && !e.is_decode(),
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Whether the extractor was reached but refused the image itself
    /// (no face, unreadable image) rather than failing as a service.
    #[must_use]
    pub fn is_image_rejection(&self) -> bool {
        match self {
            Self::EmptyImage | Self::NoFace => true,
            Self::HttpStatus { code, .. } => (400..500).contains(code) && *code != 429,
            _ => false,
        }
    }
}
