//! Shared constants for facematch.
//!
//! Defaults for every tunable setting live here so the binary, the HTTP layer
//! and the tests agree on them.

/// Embedding vector dimension of the default extractor model (VGG-Face: 4096d).
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 4096;

/// Minimum cosine similarity accepted as a positive identity match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Combined upload size limit per request (16 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Similarity reported for degenerate (zero-norm or non-finite) comparisons.
pub const DEGENERATE_SIMILARITY: f64 = -1.0;

/// Model name sent to the feature extractor.
pub const DEFAULT_EXTRACTOR_MODEL: &str = "VGG-Face";

/// Base URL of the DeepFace-compatible extractor service.
pub const DEFAULT_EXTRACTOR_URL: &str = "http://127.0.0.1:5005";

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Environment variable names.
pub const ENV_EMBEDDING_DIMENSION: &str = "FACEMATCH_EMBEDDING_DIMENSION";
pub const ENV_MATCH_THRESHOLD: &str = "FACEMATCH_MATCH_THRESHOLD";
pub const ENV_MAX_PAYLOAD_BYTES: &str = "FACEMATCH_MAX_PAYLOAD_BYTES";
pub const ENV_UPLOAD_DIR: &str = "FACEMATCH_UPLOAD_DIR";
pub const ENV_ARCHIVE_UPLOADS: &str = "FACEMATCH_ARCHIVE_UPLOADS";
pub const ENV_EXTRACTOR_URL: &str = "FACEMATCH_EXTRACTOR_URL";
pub const ENV_EXTRACTOR_MODEL: &str = "FACEMATCH_EXTRACTOR_MODEL";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
