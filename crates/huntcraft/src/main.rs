//! Huntcraft command-line tool.

mod cli;

use clap::Parser;
use cli::Cli;
use huntcraft::{HuntcraftConfig, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = HuntcraftConfig::load_or_default(&cli.config)?;
    init_logging(config.logging())?;
    tracing::debug!(config_file = %cli.config.display(), "Configuration loaded");

    cli::run(cli, config).await
}
