//! HTTP API server for facematch.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod api_types;
mod handlers;
mod multipart;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use facematch_core::Settings;
use facematch_embeddings::FeatureExtractor;
use facematch_service::{
    EnrollmentService, Matcher, SubjectService, UploadArchive, VerificationService,
};
use facematch_storage::Repository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use api_types::{
    CompareResponse, SettingsResponse, StatsResponse, UploadResponse, VersionResponse,
};

/// Room for multipart boundaries and part headers on top of the image bytes.
/// The combined image size itself is checked exactly by the services.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Validated settings, fixed for the process lifetime
    pub settings: Settings,
    /// Model name reported by `/api/settings`
    pub extractor_model: String,
    pub enrollment_service: Arc<EnrollmentService>,
    pub verification_service: Arc<VerificationService>,
    pub subject_service: Arc<SubjectService>,
}

impl AppState {
    /// Wires the services around one repository and one extractor.
    #[must_use]
    pub fn new(
        settings: Settings,
        repository: Arc<Repository>,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Self {
        let matcher = Arc::new(Matcher::new(Arc::clone(&repository), settings.threshold));
        let mut enrollment = EnrollmentService::new(
            Arc::clone(&repository),
            Arc::clone(&extractor),
            settings.max_payload_bytes,
        );
        let mut verification =
            VerificationService::new(matcher, Arc::clone(&extractor), settings.max_payload_bytes);
        if settings.archive_uploads {
            let archive = UploadArchive::new(settings.upload_dir.clone());
            enrollment = enrollment.with_archive(archive.clone());
            verification = verification.with_archive(archive);
        }

        Self {
            extractor_model: extractor.model().to_owned(),
            enrollment_service: Arc::new(enrollment),
            verification_service: Arc::new(verification),
            subject_service: Arc::new(SubjectService::new(repository)),
            settings,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.max_payload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/settings", get(handlers::admin::get_settings))
        .route("/api/stats", get(handlers::subjects::get_stats))
        .route("/api/subjects/{id}", get(handlers::subjects::get_subject))
        .route("/upload", post(handlers::faces::upload))
        .route("/compare", post(handlers::faces::compare))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> &'static str {
    "facematch"
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
