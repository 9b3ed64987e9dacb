//! The conversation state machine
//!
//! [`Conversation::handle`] takes one inbound [`Event`], moves the user's
//! [`Session`] and the ledger forward, and returns the [`Outbound`] action
//! the transport should perform.
//!
//! | Mode | Event | Next mode |
//! |------|-------|-----------|
//! | any | message with a new link | `AwaitingStatusNew` |
//! | any | message with a known link | `Idle` (link kept, edit buttons shown) |
//! | `Idle` with link | `edit_status` | `AwaitingStatusEdit` |
//! | `Idle` with link | `add_citation` | `AwaitingCitationText` |
//! | `AwaitingStatusNew` | status button | `Idle` after append |
//! | `AwaitingStatusEdit` | status button | `Idle` after status change |
//! | `AwaitingCitationText` | non-blank text | `Idle` after citation |
//! | any | `cancel` / `new_link` | `Idle` |

use crate::error::{DialogError, DialogOutcome};
use crate::event::{Command, Event};
use crate::reply::{ButtonToken, Keyboard, Outbound};
use crate::session::SessionRegistry;
use crate::text;
use chrono::Utc;
use postledger_domain::{normalize_citation, LedgerStore, Mode, Session, Status, UserId};
use postledger_extractor::extract_link;
use postledger_store::{export, SqliteLedger, StoreError};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How a reply reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyVia {
    /// As a new message
    NewMessage,
    /// By editing the message whose button was pressed
    EditMessage,
}

impl ReplyVia {
    fn reply(self, user: UserId, body: impl Into<String>) -> Outbound {
        match self {
            ReplyVia::NewMessage => Outbound::text(user, body),
            ReplyVia::EditMessage => Outbound::edit(user, body),
        }
    }
}

/// Per-user dialogs over a shared ledger
///
/// Events for the same user are handled one at a time, in arrival order,
/// with the user's session locked for the whole event. Events for different
/// users proceed concurrently.
pub struct Conversation {
    ledger: Arc<SqliteLedger>,
    sessions: SessionRegistry,
}

impl Conversation {
    /// Create a conversation driving `ledger`
    pub fn new(ledger: Arc<SqliteLedger>) -> Self {
        Self {
            ledger,
            sessions: SessionRegistry::new(),
        }
    }

    /// The underlying ledger
    pub fn ledger(&self) -> &SqliteLedger {
        &self.ledger
    }

    /// Copy of the user's session (mainly for tests and diagnostics)
    pub async fn session(&self, user: UserId) -> Session {
        self.sessions.snapshot(user).await
    }

    /// Handle one event and return the reply
    pub async fn handle(&self, event: Event) -> Outbound {
        let user = event.user();
        let via = match event {
            Event::ButtonPress { .. } => ReplyVia::EditMessage,
            _ => ReplyVia::NewMessage,
        };

        let handle = self.sessions.session_for(user);
        let mut session = handle.lock().await;

        let result = match event {
            Event::TextOrCaptionMessage { text, .. } => self.on_message(user, &text, &mut session).await,
            Event::ButtonPress { token, .. } => self.on_button(user, &token, &mut session).await,
            Event::Command { command, .. } => self.on_command(user, command).await,
        };

        match result {
            Ok(reply) => reply,
            Err(e) => {
                error!("Failed to handle event for user {}: {}", user, e);
                Self::outcome(user, &mut session, DialogOutcome::StorageFailure, via)
            }
        }
    }

    fn outcome(user: UserId, session: &mut Session, outcome: DialogOutcome, via: ReplyVia) -> Outbound {
        if outcome.resets_session() {
            session.reset();
        }
        via.reply(user, outcome.text())
    }

    /// Run a store call on the blocking pool
    async fn with_ledger<T, F>(&self, f: F) -> Result<T, DialogError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteLedger) -> Result<T, StoreError> + Send + 'static,
    {
        let ledger = Arc::clone(&self.ledger);
        Ok(tokio::task::spawn_blocking(move || f(&ledger)).await??)
    }

    async fn on_message(
        &self,
        user: UserId,
        text: &str,
        session: &mut Session,
    ) -> Result<Outbound, DialogError> {
        // Whatever arrives while a citation is pending is the citation
        if session.mode == Mode::AwaitingCitationText {
            return self.on_citation(user, text, session).await;
        }

        let Some(link) = extract_link(text) else {
            debug!("No link in message from user {}", user);
            return Ok(Self::outcome(user, session, DialogOutcome::NoLinkFound, ReplyVia::NewMessage));
        };

        let lookup = link.clone();
        let existing = self
            .with_ledger(move |ledger| ledger.find(user, &lookup))
            .await?;

        match existing {
            Some(record) => {
                debug!("User {} sent known link {} (#{})", user, link, record.number);
                session.begin_existing(link);
                Ok(Outbound::text_with(user, text::already_tracked(&record), Keyboard::edit_choices()))
            }
            None => {
                debug!("User {} sent new link {}", user, link);
                let body = text::post_received(&link);
                session.begin_new(link);
                Ok(Outbound::text_with(user, body, Keyboard::status_choices()))
            }
        }
    }

    async fn on_citation(
        &self,
        user: UserId,
        text: &str,
        session: &mut Session,
    ) -> Result<Outbound, DialogError> {
        let Some(link) = session.active_link.clone() else {
            return Ok(Self::outcome(
                user,
                session,
                DialogOutcome::StaleSessionReference,
                ReplyVia::NewMessage,
            ));
        };

        let Some(channel) = normalize_citation(text) else {
            return Ok(Self::outcome(
                user,
                session,
                DialogOutcome::EmptyCitationText,
                ReplyVia::NewMessage,
            ));
        };

        let citation = channel.clone();
        let added = self
            .with_ledger(move |ledger| ledger.add_citation(user, &link, &citation))
            .await?;

        if !added {
            warn!("Citation target vanished for user {}", user);
            return Ok(Self::outcome(user, session, DialogOutcome::RecordNotFound, ReplyVia::NewMessage));
        }

        session.reset();
        Ok(Outbound::text_with(user, text::citation_added(&channel), Keyboard::after_add()))
    }

    async fn on_button(
        &self,
        user: UserId,
        raw: &str,
        session: &mut Session,
    ) -> Result<Outbound, DialogError> {
        let via = ReplyVia::EditMessage;

        let Some(token) = ButtonToken::parse(raw) else {
            warn!("Unknown button payload from user {}: {:?}", user, raw);
            return Ok(Self::outcome(user, session, DialogOutcome::UnknownCommand, via));
        };

        match token {
            ButtonToken::ExportDb => self.export(user, via).await,
            ButtonToken::NewLink => {
                session.reset();
                Ok(Outbound::edit(user, text::READY_FOR_LINK))
            }
            ButtonToken::Cancel => {
                session.reset();
                Ok(Outbound::edit(user, text::CANCELLED))
            }
            ButtonToken::EditStatus => {
                if !Self::has_known_link(session) {
                    return Ok(Self::outcome(user, session, DialogOutcome::StaleSessionReference, via));
                }
                session.await_status_edit();
                Ok(Outbound::edit_with(user, text::PICK_NEW_STATUS, Keyboard::status_choices()))
            }
            ButtonToken::AddCitation => {
                if !Self::has_known_link(session) {
                    return Ok(Self::outcome(user, session, DialogOutcome::StaleSessionReference, via));
                }
                session.await_citation();
                Ok(Outbound::edit(user, text::ASK_CITATION))
            }
            ButtonToken::Status(status) => self.on_status(user, status, session).await,
        }
    }

    /// Whether the session refers to a link that is already in the ledger
    fn has_known_link(session: &Session) -> bool {
        session.active_link.is_some() && session.mode != Mode::AwaitingStatusNew
    }

    async fn on_status(
        &self,
        user: UserId,
        status: Status,
        session: &mut Session,
    ) -> Result<Outbound, DialogError> {
        let via = ReplyVia::EditMessage;

        match (session.mode, session.active_link.clone()) {
            (Mode::AwaitingStatusNew, Some(link)) => {
                let target = link.clone();
                let number = self
                    .with_ledger(move |ledger| ledger.append(user, &target, status))
                    .await?;

                info!("User {} added post #{} ({})", user, number, status);
                session.reset();
                Ok(Outbound::text_with(
                    user,
                    text::post_added(number, &link, status),
                    Keyboard::after_add(),
                ))
            }
            (Mode::AwaitingStatusEdit, Some(link)) => {
                let updated = self
                    .with_ledger(move |ledger| ledger.set_status(user, &link, status))
                    .await?;

                if !updated {
                    warn!("Status target vanished for user {}", user);
                    return Ok(Self::outcome(user, session, DialogOutcome::RecordNotFound, via));
                }

                info!("User {} changed a status to {}", user, status);
                session.reset();
                Ok(Outbound::text_with(user, text::status_updated(status), Keyboard::after_add()))
            }
            (mode, _) => {
                debug!("Stale status button from user {} in mode {}", user, mode.as_str());
                Ok(Self::outcome(user, session, DialogOutcome::StaleSessionReference, via))
            }
        }
    }

    async fn on_command(&self, user: UserId, command: Command) -> Result<Outbound, DialogError> {
        match command {
            Command::Start { first_name } => {
                self.with_ledger(move |ledger| ledger.ensure_initialized(user))
                    .await?;
                Ok(Outbound::text(user, text::greeting(&first_name)))
            }
            Command::Export => self.export(user, ReplyVia::NewMessage).await,
            Command::Stats => {
                let stats = self
                    .with_ledger(move |ledger| {
                        if ledger.has_ledger(user) {
                            ledger.aggregate(user).map(Some)
                        } else {
                            Ok(None)
                        }
                    })
                    .await?;

                Ok(match stats {
                    Some(stats) => Outbound::text(user, text::stats(&stats)),
                    None => Outbound::text(user, text::STATS_EMPTY),
                })
            }
        }
    }

    async fn export(&self, user: UserId, via: ReplyVia) -> Result<Outbound, DialogError> {
        let table = self
            .with_ledger(move |ledger| {
                if ledger.has_ledger(user) {
                    ledger.export_table(user).map(Some)
                } else {
                    Ok(None)
                }
            })
            .await?;

        Ok(match table {
            Some(bytes) => {
                debug!("Exporting {} bytes for user {}", bytes.len(), user);
                Outbound::SendFile {
                    user,
                    bytes,
                    filename: export::export_filename(Utc::now()),
                }
            }
            None => via.reply(user, text::LEDGER_EMPTY),
        })
    }
}
