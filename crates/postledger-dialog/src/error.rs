//! Failures inside the dialog and the user-facing outcomes they map to

use crate::text;
use postledger_store::StoreError;
use thiserror::Error;

/// Errors raised while handling an event
///
/// These never reach the user; the conversation logs them and answers with
/// [`DialogOutcome::StorageFailure`].
#[derive(Debug, Error)]
pub enum DialogError {
    /// Ledger store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The blocking store task panicked or was cancelled
    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Non-happy-path results the user is told about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// The message carried no post link
    NoLinkFound,

    /// The active link vanished from the ledger between prompt and answer
    RecordNotFound,

    /// The citation text was blank
    EmptyCitationText,

    /// A button referred to a link the session no longer holds
    StaleSessionReference,

    /// The button payload was not recognized
    UnknownCommand,

    /// The store failed; nothing was retried
    StorageFailure,
}

impl DialogOutcome {
    /// Fixed reply text
    pub fn text(&self) -> &'static str {
        match self {
            DialogOutcome::NoLinkFound => text::NO_LINK_FOUND,
            DialogOutcome::RecordNotFound | DialogOutcome::StorageFailure => text::GENERIC_FAILURE,
            DialogOutcome::EmptyCitationText => text::EMPTY_CITATION,
            DialogOutcome::StaleSessionReference => text::LINK_NOT_FOUND,
            DialogOutcome::UnknownCommand => text::UNKNOWN_COMMAND,
        }
    }

    /// Whether the session is reset after this outcome
    pub fn resets_session(&self) -> bool {
        !matches!(self, DialogOutcome::NoLinkFound | DialogOutcome::EmptyCitationText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_rejections_keep_session() {
        assert!(!DialogOutcome::NoLinkFound.resets_session());
        assert!(!DialogOutcome::EmptyCitationText.resets_session());
        assert!(DialogOutcome::StaleSessionReference.resets_session());
        assert!(DialogOutcome::StorageFailure.resets_session());
    }

    #[test]
    fn test_record_not_found_reads_as_generic_failure() {
        assert_eq!(
            DialogOutcome::RecordNotFound.text(),
            DialogOutcome::StorageFailure.text()
        );
    }
}
