//! Channels

use super::{from_json, require_name, User, Video, VideoQuery, Videos};
use crate::accumulate::{AccumulateOptions, Identity};
use crate::error::Result;
use crate::http::Connection;
use crate::status::StatusMap;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A channel: the persistent home of a broadcaster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current title
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "game")]
    pub game_name: Option<String>,
    #[serde(default)]
    pub mature: Option<bool>,
    #[serde(default, rename = "logo")]
    pub logo_url: Option<String>,
    #[serde(default, rename = "banner")]
    pub banner_url: Option<String>,
    #[serde(default, rename = "background")]
    pub background_url: Option<String>,
    #[serde(default, rename = "video_banner")]
    pub video_banner_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "delay")]
    pub stream_delay_sec: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Channel {
    /// Build a channel from its JSON object
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        from_json(json)
    }

    /// Whether the channel is flagged for mature audiences
    pub fn is_mature(&self) -> bool {
        self.mature.unwrap_or(false)
    }
}

impl Identity for Channel {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

crate::id_equality!(Channel);

/// Channel queries
#[derive(Debug, Clone)]
pub struct Channels {
    conn: Connection,
}

impl Channels {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// `GET channels/{name}`; `None` when the channel does not exist
    pub async fn get(&self, name: &str) -> Result<Option<Channel>> {
        let path = format!("channels/{}", require_name(name, "name")?);
        let json = StatusMap::new()
            .on(404, None)
            .map(async { self.conn.get(&path).await.map(Some) })
            .await?;
        json.as_ref().map(Channel::from_json).transpose()
    }

    /// Users following a channel, most recent first
    pub async fn followers(&self, name: &str, limit: Option<usize>) -> Result<Vec<User>> {
        self.conn.accumulate(self.followers_options(name, limit)?).await
    }

    /// Stream followers one at a time instead of collecting them
    pub async fn each_follower<F>(&self, name: &str, limit: Option<usize>, on_user: F) -> Result<()>
    where
        F: FnMut(User) -> Result<()> + Send,
    {
        self.conn
            .accumulate_each(self.followers_options(name, limit)?, on_user)
            .await
    }

    /// Videos recorded on a channel
    pub async fn videos(&self, name: &str, query: VideoQuery) -> Result<Vec<Video>> {
        Videos::new(self.conn.clone()).for_channel(name, query).await
    }

    fn followers_options(&self, name: &str, limit: Option<usize>) -> Result<AccumulateOptions<User>> {
        AccumulateOptions::builder()
            .path(format!("channels/{}/follows", require_name(name, "name")?))
            .items_key("follows")
            .sub_key("user")
            .factory(User::from_json)
            .max_items(limit)
            .build()
    }
}
