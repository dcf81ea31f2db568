//! Teams

use super::{from_json, require_name};
use crate::accumulate::{AccumulateOptions, Identity};
use crate::error::Result;
use crate::http::Connection;
use crate::status::StatusMap;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A group of channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description, may contain HTML
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default, rename = "logo")]
    pub logo_url: Option<String>,
    #[serde(default, rename = "banner")]
    pub banner_url: Option<String>,
    #[serde(default, rename = "background")]
    pub background_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Team {
    /// Build a team from its JSON object
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        from_json(json)
    }
}

impl Identity for Team {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

crate::id_equality!(Team);

/// Team queries
#[derive(Debug, Clone)]
pub struct Teams {
    conn: Connection,
}

impl Teams {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// `GET teams/{name}`; `None` when the team does not exist
    pub async fn get(&self, name: &str) -> Result<Option<Team>> {
        let path = format!("teams/{}", require_name(name, "name")?);
        let json = StatusMap::new()
            .on(404, None)
            .map(async { self.conn.get(&path).await.map(Some) })
            .await?;
        json.as_ref().map(Team::from_json).transpose()
    }

    /// All active teams
    pub async fn all(&self, limit: Option<usize>) -> Result<Vec<Team>> {
        let options = AccumulateOptions::builder()
            .path("teams")
            .items_key("teams")
            .factory(Team::from_json)
            .max_items(limit)
            .build()?;
        self.conn.accumulate(options).await
    }
}
