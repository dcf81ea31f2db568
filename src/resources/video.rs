//! Videos
//!
//! A video only embeds its channel's name. The full channel is a
//! [`LazyRef`] fetched on first use.

use super::{from_json, require_name, Channel};
use crate::accumulate::{AccumulateOptions, Identity};
use crate::error::{Error, Result};
use crate::http::Connection;
use crate::proxy::LazyRef;
use crate::status::StatusMap;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel fields embedded in a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
struct VideoRecord {
    #[serde(rename = "_id")]
    id: String,
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    recorded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    length: u64,
    #[serde(default)]
    game: Option<String>,
    #[serde(default)]
    preview: Option<String>,
    channel: ChannelRef,
}

/// A past broadcast or highlight
pub struct Video {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub view_count: u64,
    pub length_sec: u64,
    pub game_name: Option<String>,
    pub preview_url: Option<String>,
    channel: LazyRef<ChannelRef, Channel>,
}

impl Video {
    /// Build a video whose channel resolves through `conn`
    pub fn from_json(json: &JsonValue, conn: &Connection) -> Result<Self> {
        let record: VideoRecord = from_json(json)?;

        let conn = conn.clone();
        let channel_name = record.channel.name.clone();
        let channel = LazyRef::new(record.channel, move || {
            let conn = conn.clone();
            let path = format!("channels/{channel_name}");
            async move { Channel::from_json(&conn.get(&path).await?) }
        });

        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            recorded_at: record.recorded_at,
            url: record.url,
            view_count: record.views,
            length_sec: record.length,
            game_name: record.game,
            preview_url: record.preview,
            channel,
        })
    }

    /// Name of the channel the video was recorded on. No request.
    pub fn channel_name(&self) -> &str {
        &self.channel.known().name
    }

    /// Channel fields embedded in the video. No request.
    pub fn channel_ref(&self) -> &ChannelRef {
        self.channel.known()
    }

    /// The full channel; fetched on first call and cached
    pub async fn channel(&mut self) -> Result<&Channel> {
        self.channel.resolve().await
    }

    /// Whether the full channel has been fetched
    pub fn is_channel_loaded(&self) -> bool {
        self.channel.is_resolved()
    }
}

impl std::fmt::Debug for Video {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Video")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl Identity for Video {
    type Key = String;

    fn identity(&self) -> String {
        self.id.clone()
    }
}

crate::id_equality!(Video);

/// Filters for channel videos
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoQuery {
    /// Maximum number of videos
    pub limit: Option<usize>,
    /// Past broadcasts instead of highlights
    pub broadcasts: bool,
}

/// Video queries
#[derive(Debug, Clone)]
pub struct Videos {
    conn: Connection,
}

impl Videos {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// `GET videos/{id}`; `None` when the video does not exist
    pub async fn get(&self, id: &str) -> Result<Option<Video>> {
        if id.is_empty() {
            return Err(Error::invalid_argument("id"));
        }
        let path = format!("videos/{id}");
        let json = StatusMap::new()
            .on(404, None)
            .map(async { self.conn.get(&path).await.map(Some) })
            .await?;
        json.map(|json| Video::from_json(&json, &self.conn))
            .transpose()
    }

    /// Most viewed videos
    pub async fn top(&self, limit: Option<usize>) -> Result<Vec<Video>> {
        let conn = self.conn.clone();
        let options = AccumulateOptions::builder()
            .path("videos/top")
            .items_key("videos")
            .factory(move |json| Video::from_json(json, &conn))
            .max_items(limit)
            .build()?;
        self.conn.accumulate(options).await
    }

    /// Videos recorded on a channel, newest first
    pub async fn for_channel(&self, name: &str, query: VideoQuery) -> Result<Vec<Video>> {
        let conn = self.conn.clone();
        let options = AccumulateOptions::builder()
            .path(format!("channels/{}/videos", require_name(name, "name")?))
            .items_key("videos")
            .param("broadcasts", query.broadcasts.to_string())
            .factory(move |json| Video::from_json(json, &conn))
            .max_items(query.limit)
            .build()?;
        self.conn.accumulate(options).await
    }
}
