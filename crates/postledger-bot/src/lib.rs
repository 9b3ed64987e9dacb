//! Postledger bot library.
//!
//! Wires the ledger, the backup notifier and the conversation into a
//! Telegram bot, plus configuration loading for the binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod telegram;

pub use cli::Cli;
pub use config::BotConfig;
pub use error::ConfigError;
pub use telegram::TelegramBackupSink;
