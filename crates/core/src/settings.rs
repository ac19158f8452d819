//! Runtime settings: embedding dimension, match threshold, payload limit and
//! upload location.

use std::path::PathBuf;

use serde::Serialize;

use crate::constants::{
    DEFAULT_EMBEDDING_DIMENSION, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_PAYLOAD_BYTES,
    ENV_ARCHIVE_UPLOADS, ENV_EMBEDDING_DIMENSION, ENV_MATCH_THRESHOLD, ENV_MAX_PAYLOAD_BYTES,
    ENV_UPLOAD_DIR,
};
use crate::env_config::env_parse_with_default;
use crate::error::ConfigError;

/// Tunable settings, fixed for the lifetime of a store once validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Length of every stored and queried embedding.
    pub dimension: usize,
    /// Minimum cosine similarity for a match, in `[-1, 1]`.
    pub threshold: f64,
    /// Combined upload size limit per request.
    pub max_payload_bytes: usize,
    /// Directory where raw uploads are archived.
    pub upload_dir: PathBuf,
    /// Whether raw uploads are written to `upload_dir` at all.
    pub archive_uploads: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            threshold: DEFAULT_MATCH_THRESHOLD,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            upload_dir: default_upload_dir(),
            archive_uploads: true,
        }
    }
}

impl Settings {
    /// Reads settings from the environment, falling back to defaults for
    /// unset or unparsable values. Call [`Settings::validate`] afterwards.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dimension: env_parse_with_default(ENV_EMBEDDING_DIMENSION, defaults.dimension),
            threshold: env_parse_with_default(ENV_MATCH_THRESHOLD, defaults.threshold),
            max_payload_bytes: env_parse_with_default(
                ENV_MAX_PAYLOAD_BYTES,
                defaults.max_payload_bytes,
            ),
            upload_dir: std::env::var(ENV_UPLOAD_DIR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.upload_dir, PathBuf::from),
            archive_uploads: env_parse_with_default(ENV_ARCHIVE_UPLOADS, defaults.archive_uploads),
        }
    }

    /// Checks the numeric settings and returns them unchanged when valid.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for a zero dimension, a threshold outside
    /// `[-1, 1]` (including NaN) or a zero payload limit.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::ZeroPayloadLimit);
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    #[must_use]
    pub fn with_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    #[must_use]
    pub fn with_archive_uploads(mut self, archive_uploads: bool) -> Self {
        self.archive_uploads = archive_uploads;
        self
    }
}

fn default_upload_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facematch")
        .join("uploads")
}
