//! Postledger bot - per-user Telegram post ledger.

use anyhow::Context;
use clap::Parser;
use postledger_backup::BackupNotifier;
use postledger_bot::{telegram, BotConfig, Cli, TelegramBackupSink};
use postledger_dialog::Conversation;
use postledger_store::SqliteLedger;
use std::sync::Arc;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = BotConfig::load(&cli).context("Invalid configuration")?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting postledger bot");
    info!("Data directory: {}", config.data_dir.display());

    let bot = Bot::new(config.token()?);

    let sink = Arc::new(TelegramBackupSink::new(bot.clone()));
    let notifier = BackupNotifier::new(sink, config.backup(), tokio::runtime::Handle::current());
    let metrics = notifier.metrics();

    let ledger = SqliteLedger::new(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?
        .with_observer(Arc::new(notifier));
    let conversation = Arc::new(Conversation::new(Arc::new(ledger)));

    telegram::dispatch(bot, conversation).await;

    info!("Bot stopped.\n{}", metrics.summary());
    Ok(())
}
