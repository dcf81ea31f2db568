//! Games and game search

use super::from_json;
use crate::accumulate::{AccumulateOptions, AccumulationState, Identity};
use crate::error::{Error, Result};
use crate::http::Connection;
use crate::types::{JsonValue, QueryParams};
use serde::{Deserialize, Serialize};

/// Image URLs in several sizes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    /// URL with `{width}` and `{height}` placeholders
    #[serde(default)]
    pub template: Option<String>,
}

impl Images {
    /// Fill the template with a size
    pub fn url(&self, width: u32, height: u32) -> Option<String> {
        self.template.as_ref().map(|template| {
            template
                .replace("{width}", &width.to_string())
                .replace("{height}", &height.to_string())
        })
    }
}

#[derive(Deserialize)]
struct GameInfo {
    #[serde(rename = "_id")]
    id: u64,
    name: String,
    #[serde(default)]
    giantbomb_id: Option<u64>,
    #[serde(default, rename = "box")]
    box_images: Option<Images>,
    #[serde(default, rename = "logo")]
    logo_images: Option<Images>,
}

#[derive(Deserialize)]
struct TopEntry {
    #[serde(default)]
    channels: u64,
    #[serde(default)]
    viewers: u64,
    game: GameInfo,
}

/// A game with its current audience
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub id: u64,
    pub name: String,
    pub giantbomb_id: Option<u64>,
    pub box_images: Option<Images>,
    pub logo_images: Option<Images>,
    /// Channels currently streaming this game
    pub channel_count: u64,
    /// Viewers across all those channels
    pub viewer_count: u64,
}

impl Game {
    /// Build a game from a `games/top` entry
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let entry: TopEntry = from_json(json)?;
        Ok(Self {
            id: entry.game.id,
            name: entry.game.name,
            giantbomb_id: entry.game.giantbomb_id,
            box_images: entry.game.box_images,
            logo_images: entry.game.logo_images,
            channel_count: entry.channels,
            viewer_count: entry.viewers,
        })
    }
}

impl Identity for Game {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

crate::id_equality!(Game);

/// A search hit from [`Games::find`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSuggestion {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub giantbomb_id: Option<u64>,
    /// Relative popularity; higher is more popular
    #[serde(default)]
    pub popularity: Option<u64>,
    #[serde(default, rename = "box")]
    pub box_images: Option<Images>,
    #[serde(default, rename = "logo")]
    pub logo_images: Option<Images>,
}

impl GameSuggestion {
    /// Build a suggestion from its JSON object
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        from_json(json)
    }
}

impl Identity for GameSuggestion {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.id
    }
}

crate::id_equality!(GameSuggestion);

/// Game queries
#[derive(Debug, Clone)]
pub struct Games {
    conn: Connection,
}

impl Games {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Games with the most viewers right now, most popular first
    pub async fn top(&self, limit: Option<usize>, offset: u64) -> Result<Vec<Game>> {
        let options = AccumulateOptions::builder()
            .path("games/top")
            .items_key("top")
            .factory(Game::from_json)
            .max_items(limit)
            .offset(offset)
            .build()?;
        self.conn.accumulate(options).await
    }

    /// Games whose names resemble `name`. Not paginated.
    pub async fn find(&self, name: &str, live: bool) -> Result<Vec<GameSuggestion>> {
        if name.is_empty() {
            return Err(Error::invalid_argument("name"));
        }

        let query: QueryParams = [
            ("query".to_string(), name.to_string()),
            ("type".to_string(), "suggest".to_string()),
            ("live".to_string(), live.to_string()),
        ]
        .into_iter()
        .collect();

        let json = self.conn.get_with_query("search/games", &query).await?;
        let items = json
            .get("games")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| Error::missing_items("games", "search/games"))?;

        let mut state = AccumulationState::new();
        let mut games = Vec::new();
        for item in items {
            let game = GameSuggestion::from_json(item)?;
            if state.admit(game.identity()) {
                games.push(game);
            }
        }
        Ok(games)
    }
}
