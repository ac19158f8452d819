use std::process::ExitCode;

use anyhow::Result;
use facematch_core::Settings;
use facematch_service::SubjectService;

use crate::exit_codes::SUBJECT_NOT_FOUND;
use crate::open_repository;

pub(crate) async fn run(settings: &Settings, subject_id: &str) -> Result<ExitCode> {
    let subjects = SubjectService::new(open_repository(settings).await?);
    match subjects.summary(subject_id).await? {
        Some(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(ExitCode::SUCCESS)
        },
        None => {
            eprintln!("Subject not found: {subject_id}");
            Ok(ExitCode::from(SUBJECT_NOT_FOUND))
        },
    }
}

pub(crate) async fn stats(settings: &Settings) -> Result<ExitCode> {
    let subjects = SubjectService::new(open_repository(settings).await?);
    let count = subjects.count().await?;
    println!(
        "{}",
        serde_json::json!({"subjects": count, "storage_backend": subjects.backend_kind()})
    );
    Ok(ExitCode::SUCCESS)
}
