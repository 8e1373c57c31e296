//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use huntcraft::{AgeRating, DEFAULT_CONFIG_FILE, FinalStopMode, HuntId, LocationId, PlayOrder};
use std::path::PathBuf;

/// Huntcraft - AI-written mad-lib stories for treasure hunts.
#[derive(Parser, Debug)]
#[command(name = "huntcraft")]
#[command(about = "Generate and curate mad-lib stories for bar crawls and treasure hunts")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Dry run against an empty in-memory store; only `hunt create` is
    /// accepted since nothing persists between invocations
    #[arg(long)]
    pub memory: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and inspect hunts
    #[command(subcommand)]
    Hunt(HuntCommand),

    /// Manage a hunt's location stops
    #[command(subcommand)]
    Location(LocationCommand),

    /// Generate, curate and render stories
    #[command(subcommand)]
    Story(StoryCommand),
}

impl Commands {
    /// Whether the command looks up records made by an earlier invocation.
    pub fn reads_existing_records(&self) -> bool {
        !matches!(self, Commands::Hunt(HuntCommand::Create { .. }))
    }
}

/// Hunt commands.
#[derive(Subcommand, Debug)]
pub enum HuntCommand {
    /// Create a hunt
    Create {
        /// Hunt title
        #[arg(long)]
        title: String,
        /// City the hunt takes place in
        #[arg(long)]
        city: Option<String>,
        /// Default story theme
        #[arg(long)]
        theme: Option<String>,
        /// Default story tone
        #[arg(long)]
        tone: Option<String>,
    },

    /// Show a hunt and its stops
    Show {
        /// Hunt ID
        hunt: HuntId,
    },

    /// Edit a hunt's details; pass an empty value to clear a field
    Edit {
        /// Hunt ID
        hunt: HuntId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New city
        #[arg(long)]
        city: Option<String>,
        /// New default story theme
        #[arg(long)]
        theme: Option<String>,
        /// New default story tone
        #[arg(long)]
        tone: Option<String>,
    },

    /// Change how a hunt is played
    Settings {
        /// Hunt ID
        hunt: HuntId,
        /// FLEXIBLE or LINEAR
        #[arg(long, default_value = "FLEXIBLE")]
        play_order: PlayOrder,
        /// HAS_FINAL_STOP or NO_FINAL_STOP
        #[arg(long, default_value = "HAS_FINAL_STOP")]
        final_stop_mode: FinalStopMode,
    },
}

/// Location commands.
#[derive(Subcommand, Debug)]
pub enum LocationCommand {
    /// Append a stop to a hunt
    Add {
        /// Hunt ID
        hunt: HuntId,
        /// Venue name
        #[arg(long)]
        name: String,
        /// Street address
        #[arg(long)]
        address: Option<String>,
        /// Mark as the final stop
        #[arg(long = "final")]
        is_final: bool,
    },

    /// List a hunt's stops in order
    List {
        /// Hunt ID
        hunt: HuntId,
    },

    /// Rename a stop
    Rename {
        /// Location ID
        location: LocationId,
        /// New venue name
        name: String,
    },

    /// Delete a stop and its story options
    Delete {
        /// Location ID
        location: LocationId,
    },
}

/// Story commands.
#[derive(Subcommand, Debug)]
pub enum StoryCommand {
    /// Generate (or regenerate) a hunt's story
    Generate(GenerateArgs),

    /// Show a hunt's story and every stop's options
    Show {
        /// Hunt ID
        hunt: HuntId,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select one option at a stop
    Select {
        /// Location ID
        location: LocationId,
        /// Option number (1-3)
        option: i32,
    },

    /// Clear a stop's selection
    Clear {
        /// Location ID
        location: LocationId,
    },

    /// Render the final mad-lib with the current selections
    Render {
        /// Hunt ID
        hunt: HuntId,
        /// Emphasise filled words
        #[arg(long)]
        emphasis: bool,
        /// Replace unfilled blanks with a visible marker
        #[arg(long)]
        mark_unfilled: bool,
    },
}

/// Arguments for story generation.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Hunt ID
    pub hunt: HuntId,
    /// Story theme (defaults to the hunt's)
    #[arg(long)]
    pub theme: Option<String>,
    /// Story tone (defaults to the hunt's)
    #[arg(long)]
    pub tone: Option<String>,
    /// PG-13 or R
    #[arg(long, default_value = "PG-13")]
    pub age_rating: AgeRating,
    /// Extra instructions for the writer
    #[arg(long)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("huntcraft").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_only_create_stands_alone() {
        let hunt = HuntId::new().to_string();
        let location = LocationId::new().to_string();

        let create = parse(&["--memory", "hunt", "create", "--title", "Crawl"]);
        assert!(create.memory);
        assert!(!create.command.reads_existing_records());

        for args in [
            vec!["hunt", "show", hunt.as_str()],
            vec!["location", "list", hunt.as_str()],
            vec!["story", "select", location.as_str(), "2"],
            vec!["story", "render", hunt.as_str()],
        ] {
            assert!(parse(&args).command.reads_existing_records(), "{:?}", args);
        }
    }
}
