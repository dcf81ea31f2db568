// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # twitch-rest
//!
//! An async client for the Twitch REST API.
//!
//! ## Features
//!
//! - **Typed resources**: channels, streams, users, games, teams and videos
//! - **Pagination**: follows `_links.next` across offset-based pages
//! - **Accumulation**: deduplicated, limited collection or streaming of items
//! - **Status mapping**: expected failure statuses become plain values
//! - **Lazy references**: embedded objects fetched in full on first use
//! - **Rate limiting**: minimum interval or token bucket
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use twitch_rest::{ClientConfig, Result, Twitch};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let twitch = Twitch::new(ClientConfig::default().apply_env())?;
//!
//!     if let Some(channel) = twitch.channels().get("foo").await? {
//!         println!("{}: {:?}", channel.name, channel.status);
//!     }
//!
//!     for stream in twitch.streams().featured(Some(10)).await? {
//!         println!("{} ({} viewers)", stream.channel.name, stream.viewer_count);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Twitch facade + typed resources                 │
//! │  Channels  Streams  Users  Games  Teams  Videos (LazyRef)       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──────────┬──────────────────────┐
//! │  StatusMap   │       Accumulator        │      Paginator       │
//! │  404 → None  │  dedup, limit, streaming │  _links.next, _total │
//! └──────────────┴──────────────────────────┴──────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        Connection: GET, headers, rate limit, classification     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP transport with rate limiting
pub mod http;

/// Offset pagination over `_links.next`
pub mod pagination;

/// Deduplicated, limited accumulation across pages
pub mod accumulate;

/// HTTP status substitution
pub mod status;

/// Lazy references
pub mod proxy;

/// Typed API resources
pub mod resources;

/// Client facade
pub mod twitch;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use accumulate::{AccumulateOptions, Identity};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::Connection;
pub use proxy::LazyRef;
pub use status::{map_status, StatusMap};
pub use twitch::{default_client, Twitch};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
