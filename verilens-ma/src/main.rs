//! verilens-ma - Multimodal Analysis service
//!
//! Accepts media uploads over HTTP, runs the video and audio deepfake
//! pipelines, fuses the modality scores, and serves the rendered
//! visualization artifacts.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use verilens_ma::config::AnalysisSettings;
use verilens_ma::pipeline::Analyzer;
use verilens_ma::AppState;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "verilens-ma", about = "Multimodal media analysis service")]
struct Args {
    /// Scratch folder for uploads and artifacts (overrides env and TOML)
    #[arg(long)]
    scratch_folder: Option<String>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    bind_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting verilens-ma (Multimodal Analysis) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml_config = verilens_common::config::TomlConfig::load("ma")
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    let mut settings = AnalysisSettings::resolve(args.scratch_folder.as_deref(), toml_config.as_ref());
    if let Some(addr) = args.bind_addr {
        settings.bind_addr = addr;
    }

    verilens_common::config::ensure_directory_exists(&settings.scratch_dir)
        .map_err(|e| anyhow::anyhow!("Failed to initialize scratch folder: {}", e))?;
    info!("Scratch folder: {}", settings.scratch_dir.display());

    let analyzer = Analyzer::from_settings(&settings);
    let bind_addr = settings.bind_addr.clone();
    let state = AppState::new(settings, analyzer);
    let app = verilens_ma::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
