//! Per-user session registry
//!
//! Each user gets one [`Session`] behind its own async mutex. Holding that
//! mutex for the duration of an event is what serializes a user's events;
//! the outer map lock is only held long enough to look the entry up.

use postledger_domain::{Session, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

/// Shared handle to one user's session
pub type SessionHandle = Arc<AsyncMutex<Session>>;

/// Registry of in-memory sessions, created lazily
///
/// Entries live for the whole process: one per user seen since startup,
/// kept even after the session returns to idle. An entry is never removed,
/// because a second handle to the same user would let two events for that
/// user run at once. Memory therefore grows with the number of distinct
/// users, and restarting the bot clears every session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<UserId, SessionHandle>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's session, created idle on first use
    pub fn session_for(&self, user: UserId) -> SessionHandle {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(sessions.entry(user).or_default())
    }

    /// Copy of the user's current session
    ///
    /// Waits for any event in progress for that user.
    pub async fn snapshot(&self, user: UserId) -> Session {
        let handle = self.session_for(user);
        let session = handle.lock().await;
        session.clone()
    }

    /// Number of users seen since startup
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no user has been seen yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
