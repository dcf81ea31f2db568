//! Common types used throughout twitch-rest
//!
//! Shared type aliases and the API version selector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Query parameters for a request. Ordered so request URLs are stable.
pub type QueryParams = BTreeMap<String, String>;

// ============================================================================
// API Version
// ============================================================================

/// Version of the REST API to talk to
///
/// Only affects the `Accept` media type sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V2,
    V3,
    V5,
}

impl ApiVersion {
    /// Media type for the `Accept` header
    pub fn media_type(self) -> &'static str {
        match self {
            Self::V2 => "application/vnd.twitchtv.v2+json",
            Self::V3 => "application/vnd.twitchtv.v3+json",
            Self::V5 => "application/vnd.twitchtv.v5+json",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
            Self::V5 => "v5",
        };
        f.write_str(name)
    }
}
