//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::twitch::Twitch;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let twitch = Twitch::new(self.client_config()?)?;
        debug!(client = ?twitch.connection(), "Client ready");

        match &self.cli.command {
            Commands::Channel { name } => {
                let channel = twitch.channels().get(name).await?;
                self.output_one("channel", name, channel.as_ref())
            }
            Commands::Stream { name } => {
                let stream = twitch.streams().get(name).await?;
                self.output_one("live stream on", name, stream.as_ref())
            }
            Commands::User { name } => {
                let user = twitch.users().get(name).await?;
                self.output_one("user", name, user.as_ref())
            }
            Commands::Featured { limit } => {
                self.output_all(&twitch.streams().featured(*limit).await?)
            }
            Commands::TopGames { limit } => {
                self.output_all(&twitch.games().top(*limit, 0).await?)
            }
            Commands::Teams { limit } => self.output_all(&twitch.teams().all(*limit).await?),
            Commands::Followers { channel, limit } => {
                twitch
                    .channels()
                    .each_follower(channel, *limit, |user| self.output(&user))
                    .await
            }
        }
    }

    /// Config file, then environment, then command-line flags
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => ClientConfig::default(),
        }
        .apply_env();

        if let Some(id) = &self.cli.client_id {
            config.client_id.clone_from(id);
        }
        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }

        config.validate()?;
        Ok(config)
    }

    fn output_one<T: Serialize>(&self, what: &str, name: &str, item: Option<&T>) -> Result<()> {
        match item {
            Some(item) => self.output(item),
            None => Err(Error::Other(format!("No {what} '{name}'"))),
        }
    }

    fn output_all<T: Serialize>(&self, items: &[T]) -> Result<()> {
        items.iter().try_for_each(|item| self.output(item))
    }

    fn output<T: Serialize>(&self, item: &T) -> Result<()> {
        let value = serde_json::to_value(item)?;
        println!("{}", render(self.cli.format, &value)?);
        Ok(())
    }
}

fn render(format: OutputFormat, value: &Value) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    })
}
