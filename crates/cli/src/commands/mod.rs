pub(crate) mod enroll;
pub(crate) mod serve;
pub(crate) mod show;
pub(crate) mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use facematch_service::ImageUpload;

pub(crate) async fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Ok(ImageUpload::new(name, bytes))
}
