use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use roomwatch_daemon::cli::Args;
use roomwatch_daemon::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    let cfg = config::load_from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    tracing::info!(config = %args.config.display(), "roomwatch daemon starting");
    roomwatch_daemon::run::run(cfg).await
}
