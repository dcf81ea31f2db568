//! Users

use super::{from_json, require_name, Channel};
use crate::accumulate::{AccumulateOptions, Identity};
use crate::error::Result;
use crate::http::Connection;
use crate::status::StatusMap;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "logo")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub staff: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a user from its JSON object
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        from_json(json)
    }

    /// Whether the user is site staff
    pub fn is_staff(&self) -> bool {
        self.staff.unwrap_or(false)
    }
}

impl Identity for User {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

crate::id_equality!(User);

/// User queries
#[derive(Debug, Clone)]
pub struct Users {
    conn: Connection,
}

impl Users {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// `GET users/{name}`; `None` when the user does not exist
    pub async fn get(&self, name: &str) -> Result<Option<User>> {
        let path = format!("users/{}", require_name(name, "name")?);
        let json = StatusMap::new()
            .on(404, None)
            .map(async { self.conn.get(&path).await.map(Some) })
            .await?;
        json.as_ref().map(User::from_json).transpose()
    }

    /// Channels a user follows
    pub async fn following(&self, name: &str, limit: Option<usize>) -> Result<Vec<Channel>> {
        let options = AccumulateOptions::builder()
            .path(format!("users/{}/follows/channels", require_name(name, "name")?))
            .items_key("follows")
            .sub_key("channel")
            .factory(Channel::from_json)
            .max_items(limit)
            .build()?;
        self.conn.accumulate(options).await
    }

    /// Whether `name` follows `channel`
    pub async fn is_following(&self, name: &str, channel: &str) -> Result<bool> {
        let path = format!(
            "users/{}/follows/channels/{}",
            require_name(name, "name")?,
            require_name(channel, "channel")?
        );
        StatusMap::new()
            .on(404, false)
            .map(async { self.conn.get(&path).await.map(|_| true) })
            .await
    }
}
