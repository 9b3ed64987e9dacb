//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Postledger bot - track where your Telegram posts were published and cited.
#[derive(Debug, Default, Parser)]
#[command(name = "postledger-bot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the per-user ledgers
    #[arg(long, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Chat id or @channel receiving ledger backups
    #[arg(long, env = "BACKUP_CHAT_ID")]
    pub backup_chat_id: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
