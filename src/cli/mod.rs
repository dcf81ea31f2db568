//! CLI module
//!
//! Command-line access to the API.
//!
//! # Commands
//!
//! - `channel` - Show one channel
//! - `stream` - Show a channel's live stream
//! - `user` - Show one user
//! - `featured` - List front-page streams
//! - `top-games` - List the most watched games
//! - `teams` - List teams
//! - `followers` - Stream a channel's followers

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
