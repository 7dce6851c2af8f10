mod cli;

use aiplatform_client::config::Config;
use aiplatform_client::state::Platform;
use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{flush_notifications, handle_command, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "aiplatform_client={0},{1}={0}",
                &config.rust_log,
                env!("CARGO_BIN_NAME")
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "aiplatform v{} -> {}{}",
        env!("CARGO_PKG_VERSION"),
        config.api_url,
        config.api_prefix
    );

    let platform = Platform::new(config)?;
    let outcome = handle_command(&platform, cli.command).await;

    flush_notifications(&platform.notifications);

    outcome
}
