mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facematch_core::{
    ConfigError, DEFAULT_EXTRACTOR_MODEL, DEFAULT_EXTRACTOR_URL, ENV_DATABASE_URL,
    ENV_EXTRACTOR_MODEL, ENV_EXTRACTOR_URL, Settings,
};
use facematch_embeddings::HttpExtractor;
use facematch_storage::{Repository, StorageBackend};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "facematch")]
#[command(about = "Face enrollment and verification server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "5000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Enroll a subject from one or more image files, replacing any stored set
    Enroll {
        subject_id: String,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Verify one image against an enrolled subject
    Verify { subject_id: String, image: PathBuf },
    /// Show what is stored for a subject
    Show { subject_id: String },
    /// Number of enrolled subjects
    Stats,
}

fn get_database_url() -> Option<String> {
    std::env::var(ENV_DATABASE_URL).ok().filter(|url| !url.trim().is_empty())
}

/// Opens PostgreSQL storage. One-shot commands refuse to run without it,
/// since anything they wrote to memory would vanish on exit.
async fn open_repository(settings: &Settings) -> Result<Arc<Repository>> {
    let url = get_database_url().ok_or(ConfigError::MissingDatabaseUrl(ENV_DATABASE_URL))?;
    let backend = StorageBackend::new_postgres(&url)
        .await
        .context("failed to open PostgreSQL storage")?;
    Ok(Arc::new(Repository::new(backend, settings.dimension)))
}

/// Like [`open_repository`], but the long-running server may fall back to
/// in-memory storage.
async fn open_server_repository(settings: &Settings) -> Result<Arc<Repository>> {
    if get_database_url().is_some() {
        return open_repository(settings).await;
    }
    tracing::warn!(
        "{ENV_DATABASE_URL} not set, using in-memory storage; enrollments are lost on exit"
    );
    Ok(Arc::new(Repository::new(StorageBackend::new_memory(), settings.dimension)))
}

fn build_extractor() -> Result<Arc<HttpExtractor>> {
    let url = std::env::var(ENV_EXTRACTOR_URL).unwrap_or_else(|_| DEFAULT_EXTRACTOR_URL.to_owned());
    let model =
        std::env::var(ENV_EXTRACTOR_MODEL).unwrap_or_else(|_| DEFAULT_EXTRACTOR_MODEL.to_owned());
    let extractor = HttpExtractor::new(&url, &model).context("failed to build extractor client")?;
    tracing::info!(url = %extractor.base_url(), model = %model, "feature extractor configured");
    Ok(Arc::new(extractor))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(exit_codes::exit_code_for(&err))
        },
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::from_env().validate().context("invalid configuration")?;

    match cli.command {
        Commands::Serve { port, host } => {
            commands::serve::run(settings, port, host).await?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Enroll { subject_id, images } => {
            commands::enroll::run(settings, subject_id, images).await
        },
        Commands::Verify { subject_id, image } => {
            commands::verify::run(settings, subject_id, image).await
        },
        Commands::Show { subject_id } => commands::show::run(&settings, &subject_id).await,
        Commands::Stats => commands::show::stats(&settings).await,
    }
}
