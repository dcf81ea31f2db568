//! Client facade
//!
//! [`Twitch`] owns one [`Connection`] and hands out the resource handles that
//! share it.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::Connection;
use crate::resources::{Channels, Games, Streams, Teams, Users, Videos};
use once_cell::sync::OnceCell;

static DEFAULT_CLIENT: OnceCell<Twitch> = OnceCell::new();

/// Entry point to the API
#[derive(Debug, Clone)]
pub struct Twitch {
    conn: Connection,
}

impl Twitch {
    /// Create a client from a config
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_connection(Connection::new(config)?))
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection, for raw or paginated requests
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn channels(&self) -> Channels {
        Channels::new(self.conn.clone())
    }

    pub fn streams(&self) -> Streams {
        Streams::new(self.conn.clone())
    }

    pub fn users(&self) -> Users {
        Users::new(self.conn.clone())
    }

    pub fn games(&self) -> Games {
        Games::new(self.conn.clone())
    }

    pub fn teams(&self) -> Teams {
        Teams::new(self.conn.clone())
    }

    pub fn videos(&self) -> Videos {
        Videos::new(self.conn.clone())
    }
}

/// Process-wide client built from the default config plus the environment.
///
/// Built on first use. A failed build is not cached.
pub fn default_client() -> Result<&'static Twitch> {
    DEFAULT_CLIENT.get_or_try_init(|| Twitch::new(ClientConfig::default().apply_env()))
}
