use std::sync::Arc;

use anyhow::Result;
use facematch_core::Settings;
use facematch_http::{AppState, create_router};

use crate::{build_extractor, open_server_repository};

pub(crate) async fn run(settings: Settings, port: u16, host: String) -> Result<()> {
    let repository = open_server_repository(&settings).await?;
    let extractor = build_extractor()?;

    tracing::info!(
        dimension = settings.dimension,
        threshold = settings.threshold,
        max_payload_bytes = settings.max_payload_bytes,
        archive_uploads = settings.archive_uploads,
        upload_dir = %settings.upload_dir.display(),
        "settings loaded"
    );

    let state = Arc::new(AppState::new(settings, repository, extractor));
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
