use facematch_core::{MatchOutcome, Settings};
use facematch_service::EnrollmentReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: Settings,
    pub extractor_model: String,
    pub storage_backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub subjects: u64,
    pub storage_backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: EnrollmentReport,
}

/// Body of `/compare`. The outcome is flattened so the `result` tag sits next
/// to the human-readable message.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub subject_id: String,
    pub message: &'static str,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}
