//! Postledger Backup
//!
//! Best-effort shipping of ledger snapshots after every mutation.
//!
//! # Overview
//!
//! The store hands a rendered copy of the user's ledger to a
//! [`postledger_domain::SnapshotObserver`] after each committed change.
//! [`BackupNotifier`] is that observer: it tags the snapshot with
//! [`BackupMetadata`] and spawns a detached task that passes it to a
//! [`BackupSink`]. Failures are logged and counted in [`BackupMetrics`],
//! never reported to the caller and never retried.
//!
//! # Configuration
//!
//! ```toml
//! [backup]
//! target = "-1001234567890"
//! ```
//!
//! Without a target the notifier drops every snapshot.

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod notifier;
mod sink;

pub use config::BackupConfig;
pub use error::BackupError;
pub use metrics::BackupMetrics;
pub use notifier::BackupNotifier;
pub use sink::{BackupMetadata, BackupSink};
