//! Face embedding extraction
//!
//! The core only sees the [`FeatureExtractor`] trait; [`HttpExtractor`] talks to
//! a DeepFace-compatible `/represent` endpoint.

mod client;
pub mod error;
#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use client::{HttpExtractor, image_data_uri};
pub use error::ExtractionError;

/// Turns raw image bytes into a face embedding.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// Extracts one embedding from `image`. The length of the returned vector
    /// is the model's output dimension; callers validate it.
    async fn extract(&self, image: &[u8]) -> Result<Vec<f32>, ExtractionError>;

    /// Model name reported in logs and status output.
    fn model(&self) -> &str;
}
