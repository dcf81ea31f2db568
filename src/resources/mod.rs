//! Typed API resources
//!
//! Each resource is a plain data type built from one JSON object plus a small
//! handle type (`Channels`, `Streams`, ...) whose methods build a path and
//! delegate to [`Connection`](crate::http::Connection).

mod channel;
mod game;
mod stream;
mod team;
mod user;
mod video;

pub use channel::{Channel, Channels};
pub use game::{Game, GameSuggestion, Games, Images};
pub use stream::{StreamQuery, Stream, Streams};
pub use team::{Team, Teams};
pub use user::{User, Users};
pub use video::{ChannelRef, Video, VideoQuery, Videos};

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;

/// Deserialize one resource from its JSON object
pub(crate) fn from_json<T: DeserializeOwned>(json: &JsonValue) -> Result<T> {
    Ok(T::deserialize(json)?)
}

/// Reject empty names before they turn into a request for the collection
pub(crate) fn require_name<'a>(name: &'a str, what: &str) -> Result<&'a str> {
    if name.is_empty() {
        Err(Error::invalid_argument(what))
    } else {
        Ok(name)
    }
}
