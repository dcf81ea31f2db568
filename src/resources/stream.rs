//! Live streams

use super::{from_json, require_name, Channel};
use crate::accumulate::{AccumulateOptions, Identity};
use crate::error::{Error, Result};
use crate::http::Connection;
use crate::status::StatusMap;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// A broadcast that is live right now
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stream {
    #[serde(rename = "_id")]
    pub id: u64,
    /// Broadcasting software, e.g. "obs"
    #[serde(default)]
    pub broadcaster: Option<String>,
    #[serde(default, rename = "game")]
    pub game_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "viewers")]
    pub viewer_count: u64,
    #[serde(default, rename = "preview")]
    pub preview_url: Option<String>,
    /// Embedded in the response; no extra request
    pub channel: Channel,
}

impl Stream {
    /// Build a stream from its JSON object
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        from_json(json)
    }
}

impl Identity for Stream {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

crate::id_equality!(Stream);

/// Filters for [`Streams::find`]
#[derive(Debug, Clone, Default)]
pub struct StreamQuery {
    /// Only streams playing this game
    pub game: Option<String>,
    /// Only streams on these channels
    pub channels: Vec<String>,
    /// Maximum number of streams
    pub limit: Option<usize>,
    /// Offset into the result set
    pub offset: u64,
}

impl StreamQuery {
    /// Streams playing `game`
    pub fn game(game: impl Into<String>) -> Self {
        Self {
            game: Some(game.into()),
            ..Self::default()
        }
    }

    /// Streams on any of `channels`
    pub fn channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Cap the number of results
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip into the result set
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

/// Stream queries
#[derive(Debug, Clone)]
pub struct Streams {
    conn: Connection,
}

impl Streams {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// `GET streams/{channel}`; `None` when the channel is offline or unknown
    pub async fn get(&self, channel: &str) -> Result<Option<Stream>> {
        let path = format!("streams/{}", require_name(channel, "channel")?);
        let json = StatusMap::new()
            .on(404, None)
            .map(async { self.conn.get(&path).await.map(Some) })
            .await?;
        match json.as_ref().and_then(|json| json.get("stream")) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(stream) => Stream::from_json(stream).map(Some),
        }
    }

    /// All live streams, most viewers first
    pub async fn all(&self, limit: Option<usize>) -> Result<Vec<Stream>> {
        self.conn.accumulate(Self::all_options(limit)?).await
    }

    /// Stream all live streams one at a time
    pub async fn each<F>(&self, limit: Option<usize>, on_stream: F) -> Result<()>
    where
        F: FnMut(Stream) -> Result<()> + Send,
    {
        self.conn
            .accumulate_each(Self::all_options(limit)?, on_stream)
            .await
    }

    /// Live streams matching a game and/or a set of channels
    pub async fn find(&self, query: StreamQuery) -> Result<Vec<Stream>> {
        if query.game.is_none() && query.channels.is_empty() {
            return Err(Error::invalid_argument("query"));
        }

        let mut builder = AccumulateOptions::builder()
            .path("streams")
            .items_key("streams")
            .factory(Stream::from_json)
            .max_items(query.limit)
            .offset(query.offset);
        if let Some(game) = &query.game {
            builder = builder.param("game", game);
        }
        if !query.channels.is_empty() {
            builder = builder.param("channel", query.channels.join(","));
        }

        self.conn.accumulate(builder.build()?).await
    }

    /// Streams promoted on the front page
    pub async fn featured(&self, limit: Option<usize>) -> Result<Vec<Stream>> {
        let options = AccumulateOptions::builder()
            .path("streams/featured")
            .items_key("featured")
            .sub_key("stream")
            .factory(Stream::from_json)
            .max_items(limit)
            .build()?;
        self.conn.accumulate(options).await
    }

    fn all_options(limit: Option<usize>) -> Result<AccumulateOptions<Stream>> {
        AccumulateOptions::builder()
            .path("streams")
            .items_key("streams")
            .factory(Stream::from_json)
            .max_items(limit)
            .build()
    }
}
