//! Record module - one tracked link in a user's ledger

use crate::Status;
use std::fmt;

/// Text shown in place of an empty citation list
pub const NO_CITATIONS_YET: &str = "No citations yet";

/// Delimiter used when citations are rendered on one line
pub const CITATION_DELIMITER: &str = ", ";

/// Opaque identifier of the user owning a ledger
///
/// Every ledger and session is partitioned by this value; nothing is shared
/// across users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u64);

impl UserId {
    /// Get the raw identifier
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A tracked link and its review history
///
/// `number` is assigned once at creation (record count + 1) and never changes.
/// `citations` only ever grows, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Position in the ledger, starting at 1
    pub number: u32,

    /// Canonical link; unique within one user's ledger
    pub link: String,

    /// Publication timing bucket
    pub status: Status,

    /// Channels that quoted the post, oldest first
    pub citations: Vec<String>,

    /// Creation time (Unix seconds, UTC)
    pub created_at: u64,
}

impl Record {
    /// Create a record with no citations
    pub fn new(number: u32, link: String, status: Status, created_at: u64) -> Self {
        Self {
            number,
            link,
            status,
            citations: Vec::new(),
            created_at,
        }
    }

    /// Citations joined for display, or [`NO_CITATIONS_YET`] when there are none
    ///
    /// # Examples
    ///
    /// ```
    /// use postledger_domain::{Record, Status, NO_CITATIONS_YET};
    ///
    /// let mut record = Record::new(1, "https://t.me/news/1".into(), Status::First, 0);
    /// assert_eq!(record.citations_display(), NO_CITATIONS_YET);
    ///
    /// record.citations.push("ChannelA".into());
    /// record.citations.push("ChannelB".into());
    /// assert_eq!(record.citations_display(), "ChannelA, ChannelB");
    /// ```
    pub fn citations_display(&self) -> String {
        if self.citations.is_empty() {
            NO_CITATIONS_YET.to_string()
        } else {
            self.citations.join(CITATION_DELIMITER)
        }
    }

    /// Number of citations attached to the record
    pub fn citation_count(&self) -> usize {
        self.citations.len()
    }
}

/// Normalize free-text citation input
///
/// Trims surrounding whitespace and folds line breaks into single spaces so a
/// citation always occupies one line. Returns `None` for blank input.
pub fn normalize_citation(text: &str) -> Option<String> {
    let folded = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if folded.is_empty() {
        None
    } else {
        Some(folded)
    }
}
