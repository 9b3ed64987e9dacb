//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the dialog logic and the
//! infrastructure. Implementations live in other crates.

use crate::{LedgerStats, Record, Status, UserId};

/// Trait for a per-user ledger of tracked links
///
/// Implemented by the infrastructure layer (postledger-store).
///
/// Every method is scoped to one user. Implementations must keep `link`
/// unique within a user's ledger and assign dense, never-reused numbers.
pub trait LedgerStore {
    /// Error type for store operations
    type Error;

    /// Create an empty ledger for the user if none exists (idempotent)
    fn ensure_initialized(&self, user: UserId) -> Result<(), Self::Error>;

    /// Whether a record with this link exists
    fn exists(&self, user: UserId, link: &str) -> Result<bool, Self::Error>;

    /// Get the record for a link
    fn find(&self, user: UserId, link: &str) -> Result<Option<Record>, Self::Error>;

    /// Append a new record and return its number
    ///
    /// Fails if the link is already present for this user.
    fn append(&self, user: UserId, link: &str, status: Status) -> Result<u32, Self::Error>;

    /// Overwrite the status of a record; `Ok(false)` if the link is unknown
    fn set_status(&self, user: UserId, link: &str, status: Status) -> Result<bool, Self::Error>;

    /// Append a citation to a record
    ///
    /// `Ok(false)` if the text is blank or the link is unknown.
    fn add_citation(&self, user: UserId, link: &str, text: &str) -> Result<bool, Self::Error>;

    /// All records in ascending number order
    fn list_all(&self, user: UserId) -> Result<Vec<Record>, Self::Error>;

    /// Totals over the user's ledger
    fn aggregate(&self, user: UserId) -> Result<LedgerStats, Self::Error> {
        let records = self.list_all(user)?;
        Ok(LedgerStats::from_records(&records))
    }
}

/// A rendered copy of one user's ledger, taken right after a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Owner of the ledger
    pub user: UserId,

    /// Suggested file name for the rendered table
    pub filename: String,

    /// Rendered table contents
    pub bytes: Vec<u8>,

    /// Snapshot time (Unix seconds, UTC)
    pub taken_at: u64,
}

/// Trait for receivers of post-mutation ledger snapshots
///
/// Implemented by the backup layer (postledger-backup). Implementations must
/// return quickly: they are called while the user's write is still in
/// progress.
pub trait SnapshotObserver: Send + Sync {
    /// Called once per committed mutation
    fn ledger_changed(&self, snapshot: LedgerSnapshot);
}
