use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use facematch_core::Settings;
use facematch_service::{EnrollmentService, UploadArchive};

use super::read_image;
use crate::{build_extractor, open_repository};

pub(crate) async fn run(
    settings: Settings,
    subject_id: String,
    paths: Vec<PathBuf>,
) -> Result<ExitCode> {
    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        images.push(read_image(path).await?);
    }

    let repository = open_repository(&settings).await?;
    let mut service =
        EnrollmentService::new(repository, build_extractor()?, settings.max_payload_bytes);
    if settings.archive_uploads {
        service = service.with_archive(UploadArchive::new(settings.upload_dir));
    }

    let report = service.enroll(&subject_id, images).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}
