use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::FeatureExtractor;
use crate::error::ExtractionError;

/// Back-off before each attempt; the first attempt runs immediately.
const DEFAULT_RETRY_DELAYS_MS: [u64; 3] = [0, 500, 2000];
const REQUEST_TIMEOUT_SECS: u64 = 60;
const ERROR_BODY_PREVIEW: usize = 300;

#[derive(Serialize)]
struct RepresentRequest<'a> {
    img: String,
    model_name: &'a str,
    enforce_detection: bool,
}

#[derive(Deserialize)]
struct RepresentResponse {
    #[serde(default)]
    results: Vec<RepresentResult>,
}

#[derive(Deserialize)]
struct RepresentResult {
    embedding: Vec<f32>,
    #[serde(default)]
    face_confidence: Option<f64>,
}

/// Client for a DeepFace-compatible representation service.
pub struct HttpExtractor {
    client: reqwest::Client,
    base_url: String,
    model: String,
    retry_delays: Vec<Duration>,
}

impl std::fmt::Debug for HttpExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExtractor")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("attempts", &self.retry_delays.len())
            .finish()
    }
}

impl HttpExtractor {
    /// Creates a client for `base_url` requesting embeddings from `model`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: &str, model: &str) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ExtractionError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
            retry_delays: DEFAULT_RETRY_DELAYS_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        })
    }

    /// Replaces the retry schedule. One entry per attempt; an empty schedule
    /// still makes a single attempt.
    #[must_use]
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn represent_once(
        &self,
        request: &RepresentRequest<'_>,
    ) -> Result<Vec<f32>, ExtractionError> {
        let response = self
            .client
            .post(format!("{}/represent", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, ERROR_BODY_PREVIEW).to_owned(),
            });
        }

        let parsed: RepresentResponse =
            serde_json::from_str(&body).map_err(|e| ExtractionError::JsonParse {
                context: format!("represent response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        let first = parsed.results.into_iter().next().ok_or(ExtractionError::NoFace)?;
        if first.embedding.is_empty() {
            return Err(ExtractionError::NoFace);
        }
        tracing::debug!(
            dimension = first.embedding.len(),
            face_confidence = ?first.face_confidence,
            "embedding extracted"
        );
        Ok(first.embedding)
    }
}

#[async_trait]
impl FeatureExtractor for HttpExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<f32>, ExtractionError> {
        if image.is_empty() {
            return Err(ExtractionError::EmptyImage);
        }
        let request = RepresentRequest {
            img: image_data_uri(image),
            model_name: &self.model,
            enforce_detection: true,
        };

        let attempts = self.retry_delays.len().max(1);
        let mut last_error: Option<ExtractionError> = None;
        for attempt in 0..attempts {
            let delay = self.retry_delays.get(attempt).copied().unwrap_or_default();
            if attempt > 0 {
                tracing::warn!("extractor retry attempt {attempt}/{} after {delay:?}", attempts - 1);
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.represent_once(&request).await {
                Ok(embedding) => return Ok(embedding),
                Err(err) if err.is_transient() => last_error = Some(err),
                Err(err) => return Err(err),
            }
        }

        Err(ExtractionError::RetriesExhausted(Box::new(
            last_error.unwrap_or(ExtractionError::NoFace),
        )))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Encodes `image` as a `data:` URI, sniffing the MIME type from magic bytes.
#[must_use]
pub fn image_data_uri(image: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(image), STANDARD.encode(image))
}

fn sniff_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if image.starts_with(b"GIF8") {
        "image/gif"
    } else if image.starts_with(b"BM") {
        "image/bmp"
    } else if image.starts_with(b"RIFF") && image.get(8..12) == Some(&b"WEBP"[..]) {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub(crate) fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
