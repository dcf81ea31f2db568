//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query the Twitch REST API
#[derive(Parser, Debug)]
#[command(name = "twitch-rest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client id sent with every request
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API root, e.g. https://api.twitch.tv/kraken/
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a channel
    Channel {
        /// Channel name
        name: String,
    },

    /// Show the live stream on a channel
    Stream {
        /// Channel name
        name: String,
    },

    /// Show a user
    User {
        /// User name
        name: String,
    },

    /// List streams promoted on the front page
    Featured {
        /// Maximum number of streams
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the games with the most viewers
    TopGames {
        /// Maximum number of games
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List teams
    Teams {
        /// Maximum number of teams
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List users following a channel, printed as they arrive
    Followers {
        /// Channel name
        channel: String,

        /// Maximum number of followers
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one object per line)
    Json,
    /// Indented, human-readable JSON
    Pretty,
}
