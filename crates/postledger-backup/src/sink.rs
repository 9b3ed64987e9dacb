//! Destination for ledger snapshots

use crate::BackupError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postledger_domain::{LedgerSnapshot, UserId};
use serde::{Deserialize, Serialize};

/// Tag attached to every shipped snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Owner of the ledger
    pub user_id: u64,

    /// When the snapshot was taken (RFC 3339, UTC)
    pub timestamp: String,
}

impl BackupMetadata {
    /// Metadata for a snapshot of `user` taken at `taken_at` (Unix seconds)
    pub fn new(user: UserId, taken_at: u64) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp(taken_at as i64, 0)
            .unwrap_or_default()
            .to_rfc3339();
        Self {
            user_id: user.value(),
            timestamp,
        }
    }

    /// Metadata derived from the snapshot itself
    pub fn for_snapshot(snapshot: &LedgerSnapshot) -> Self {
        Self::new(snapshot.user, snapshot.taken_at)
    }

    /// JSON form, used as the file caption
    pub fn to_caption(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"user_id\":{}}}", self.user_id))
    }
}

/// Something that can receive a snapshot file
///
/// Implementations are expected to make one attempt; the notifier never
/// retries.
#[async_trait]
pub trait BackupSink: Send + Sync {
    /// Ship one snapshot to `target`
    async fn send_snapshot(
        &self,
        target: &str,
        snapshot: LedgerSnapshot,
        metadata: BackupMetadata,
    ) -> Result<(), BackupError>;
}
