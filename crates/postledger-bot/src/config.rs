//! Bot configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags or their environment variables.
//!
//! ```toml
//! data_dir = "user_data"
//! backup_chat_id = "-1001234567890"
//! bot_token = "123456:ABC..."
//! log_filter = "info,postledger_store=debug"
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use postledger_backup::BackupConfig;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Bot configuration loaded from TOML
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    /// Root directory of the per-user ledgers
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Backup destination (chat id or `@channel`); backups are off without it
    #[serde(default)]
    pub backup_chat_id: Option<String>,

    /// Telegram bot token
    #[serde(default)]
    pub bot_token: Option<String>,

    /// `tracing` filter directive
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Default data directory: `user_data`
fn default_data_dir() -> PathBuf {
    PathBuf::from("user_data")
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backup_chat_id: None,
            bot_token: None,
            log_filter: None,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("data_dir", &self.data_dir)
            .field("backup_chat_id", &self.backup_chat_id)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl BotConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: BotConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the effective configuration from the command line
    ///
    /// Reads `--config` when given, applies flag/env overrides, and checks
    /// that a token is present.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite file values with flags and environment variables
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(chat_id) = &cli.backup_chat_id {
            self.backup_chat_id = Some(chat_id.clone());
        }
        if let Some(token) = &cli.token {
            self.bot_token = Some(token.clone());
        }
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token().map(|_| ())
    }

    /// The bot token, if set and non-blank
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("bot_token".to_string()))
    }

    /// Backup settings derived from `backup_chat_id`
    pub fn backup(&self) -> BackupConfig {
        BackupConfig {
            target: self.backup_chat_id.clone(),
        }
    }

    /// Filter directive for the log subscriber
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
