use thiserror::Error;

/// Malformed or missing caller input. Always recoverable, never mutates state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("subject_id must not be empty")]
    EmptySubjectId,

    #[error("embedding set must contain at least one vector")]
    EmptyEmbeddings,

    #[error("embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch { index: usize, expected: usize, actual: usize },

    #[error("embedding {index} contains a non-finite value at position {position}")]
    NonFinite { index: usize, position: usize },

    #[error("no images provided")]
    NoImages,

    #[error("payload of {actual} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize, actual: usize },

    #[error("invalid input: {0}")]
    Other(String),
}

/// Rejected runtime configuration, raised once at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("embedding dimension must be greater than zero")]
    ZeroDimension,

    #[error("match threshold {0} is outside [-1, 1]")]
    ThresholdOutOfRange(f64),

    #[error("max payload size must be greater than zero")]
    ZeroPayloadLimit,

    /// A command that needs durable storage was started without it.
    #[error("{0} must be set for this command; only `serve` falls back to in-memory storage")]
    MissingDatabaseUrl(&'static str),
}
