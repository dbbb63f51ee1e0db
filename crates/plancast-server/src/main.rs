mod app;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use plancast_core::config::GeneratorConfig;

use app::AppState;

#[derive(Parser)]
#[command(
    name = "plancast",
    about = "Floor-plan layout service with schematic render generation"
)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Directory for uploaded photos and saved layouts
    #[arg(long, default_value = "uploads")]
    uploads_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = GeneratorConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!("COMET_API_KEY is not set; generate-plan requests will fail");
    }

    let state = Arc::new(AppState::new(cli.uploads_dir, config));
    app::run_serve(state, &cli.bind, cli.port).await
}
