use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use facematch_core::{MatchOutcome, Settings};
use facematch_service::{Matcher, UploadArchive, VerificationService};

use super::read_image;
use crate::exit_codes::{NO_MATCH, SUBJECT_NOT_FOUND};
use crate::{build_extractor, open_repository};

/// Prints the outcome as JSON. Exit status: 0 match, 1 no match, 2 unknown
/// subject. Failures exit through [`crate::exit_codes`].
pub(crate) async fn run(settings: Settings, subject_id: String, path: PathBuf) -> Result<ExitCode> {
    let image = read_image(&path).await?;
    let repository = open_repository(&settings).await?;
    let matcher = Arc::new(Matcher::new(repository, settings.threshold));
    let mut service =
        VerificationService::new(matcher, build_extractor()?, settings.max_payload_bytes);
    if settings.archive_uploads {
        service = service.with_archive(UploadArchive::new(settings.upload_dir));
    }

    let outcome = service.verify(&subject_id, image).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(match outcome {
        MatchOutcome::Match { .. } => ExitCode::SUCCESS,
        MatchOutcome::NoMatch { .. } => ExitCode::from(NO_MATCH),
        MatchOutcome::SubjectNotFound => ExitCode::from(SUBJECT_NOT_FOUND),
    })
}
