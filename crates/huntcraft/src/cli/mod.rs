//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the huntcraft binary.

mod commands;
mod hunt;
mod location;
mod story;

pub use commands::{
    Cli, Commands, GenerateArgs, HuntCommand, LocationCommand, StoryCommand,
};

use huntcraft::{
    HuntRepository, HuntcraftConfig, InMemoryHuntStore, PgHuntStore, StoryRepository,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Opens the configured store and runs one command against it.
pub async fn run(cli: Cli, config: HuntcraftConfig) -> anyhow::Result<()> {
    if cli.memory {
        if cli.command.reads_existing_records() {
            anyhow::bail!(
                "--memory starts from an empty store each run, so only `hunt create` can use it"
            );
        }
        warn!("Using in-memory store; nothing will be saved");
        return dispatch(Arc::new(InMemoryHuntStore::new()), cli.command, &config).await;
    }

    let store = PgHuntStore::connect(config.database())?;
    let applied = store.migrate().await?;
    if applied > 0 {
        info!(applied, "Database schema updated");
    }
    dispatch(Arc::new(store), cli.command, &config).await
}

async fn dispatch<S>(store: Arc<S>, command: Commands, config: &HuntcraftConfig) -> anyhow::Result<()>
where
    S: HuntRepository + StoryRepository + 'static,
{
    match command {
        Commands::Hunt(command) => hunt::handle_hunt_command(store.as_ref(), command).await,
        Commands::Location(command) => {
            location::handle_location_command(store.as_ref(), command).await
        }
        Commands::Story(command) => story::handle_story_command(store, command, config).await,
    }
}
