//! Telegram transport: update handlers, reply rendering and the backup sink.

use async_trait::async_trait;
use postledger_backup::{BackupError, BackupMetadata, BackupSink};
use postledger_dialog::{Command, Conversation, Event, Keyboard, Outbound};
use postledger_domain::{LedgerSnapshot, UserId};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, Recipient};
use teloxide::RequestError;
use tracing::{debug, warn};

/// Build the update handler tree
pub fn schema() -> teloxide::dispatching::UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

/// Run the dispatcher until Ctrl+C
pub async fn dispatch(bot: Bot, conversation: Arc<Conversation>) {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![conversation])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// Translate a chat message into a dialog event
///
/// Returns `None` for slash commands the bot does not know.
pub fn message_event(user: UserId, first_name: &str, text: &str) -> Option<Event> {
    if let Some(command) = Command::parse(text, first_name) {
        return Some(Event::Command { user, command });
    }
    if text.trim_start().starts_with('/') {
        return None;
    }
    Some(Event::TextOrCaptionMessage {
        user,
        text: text.to_string(),
    })
}

async fn handle_message(bot: Bot, msg: Message, conversation: Arc<Conversation>) -> anyhow::Result<()> {
    let Some(from) = msg.from() else {
        return Ok(());
    };
    let user = UserId(from.id.0);

    // Media without a caption arrives as empty text
    let text = msg.text().or_else(|| msg.caption()).unwrap_or_default();

    let Some(event) = message_event(user, &from.first_name, text) else {
        debug!("Ignoring unknown command from user {}", user);
        return Ok(());
    };

    let reply = conversation.handle(event).await;
    render(&bot, reply, reply_chat(user, Some(msg.chat.id)), None).await?;
    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, conversation: Arc<Conversation>) -> anyhow::Result<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(token) = q.data.clone() else {
        return Ok(());
    };
    let user = UserId(q.from.id.0);

    let origin = q.message.as_ref();
    let reply = conversation.handle(Event::ButtonPress { user, token }).await;
    render(&bot, reply, reply_chat(user, origin.map(|m| m.chat.id)), origin).await?;
    Ok(())
}

/// Chat a reply goes to
///
/// Replies follow the update's chat, so group messages are answered in the
/// group. Without one the user's private chat is used, whose id equals the
/// user id.
fn reply_chat(user: UserId, origin: Option<ChatId>) -> ChatId {
    origin.unwrap_or(ChatId(user.value() as i64))
}

/// Convert a dialog keyboard into Telegram inline markup
pub fn inline_keyboard(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.token.to_string()))
            .collect::<Vec<_>>()
    }))
}

/// Perform an outbound action in `chat`
///
/// `origin` is the message whose button was pressed; edits fall back to a
/// new message without it.
async fn render(bot: &Bot, reply: Outbound, chat: ChatId, origin: Option<&Message>) -> Result<(), RequestError> {
    match reply {
        Outbound::SendText { text, buttons, .. } => {
            send_text(bot, chat, text, buttons).await?;
        }
        Outbound::SendFile { bytes, filename, .. } => {
            bot.send_document(chat, InputFile::memory(bytes).file_name(filename))
                .await?;
        }
        Outbound::EditLastMessage { text, buttons, .. } => match origin {
            Some(message) => {
                let request = bot.edit_message_text(message.chat.id, message.id, text);
                match buttons {
                    Some(keyboard) => request.reply_markup(inline_keyboard(&keyboard)).await?,
                    None => request.await?,
                };
            }
            None => {
                send_text(bot, chat, text, buttons).await?;
            }
        },
    }
    Ok(())
}

async fn send_text(bot: &Bot, chat: ChatId, text: String, buttons: Option<Keyboard>) -> Result<(), RequestError> {
    let request = bot.send_message(chat, text);
    match buttons {
        Some(keyboard) => request.reply_markup(inline_keyboard(&keyboard)).await?,
        None => request.await?,
    };
    Ok(())
}

/// Sends backups as documents to a Telegram chat
pub struct TelegramBackupSink {
    bot: Bot,
}

impl TelegramBackupSink {
    /// Create a sink sending through `bot`
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Numeric ids address chats directly, anything else is a channel username
pub fn backup_recipient(target: &str) -> Recipient {
    match target.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(target.to_string()),
    }
}

#[async_trait]
impl BackupSink for TelegramBackupSink {
    async fn send_snapshot(
        &self,
        target: &str,
        snapshot: LedgerSnapshot,
        metadata: BackupMetadata,
    ) -> Result<(), BackupError> {
        let document = InputFile::memory(snapshot.bytes).file_name(snapshot.filename);
        self.bot
            .send_document(backup_recipient(target), document)
            .caption(metadata.to_caption())
            .await
            .map_err(|e| {
                warn!("Telegram rejected backup for user {}: {}", snapshot.user, e);
                BackupError::Transport(e.to_string())
            })?;
        Ok(())
    }
}
