//! Postledger Domain Layer
//!
//! This crate contains the core domain model for Postledger. It has no
//! external dependencies and defines the value objects and trait interfaces
//! that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Record**: One tracked link with its status, citations and creation time
//! - **Status**: The publication timing bucket chosen for a record
//! - **Citation**: A channel that quoted the tracked post
//! - **Session**: A user's transient position in the review dialog
//! - **Ledger**: The durable, per-user collection of records
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Storage, codecs and transports live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod session;
pub mod stats;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use record::{normalize_citation, Record, UserId, CITATION_DELIMITER, NO_CITATIONS_YET};
pub use session::{Mode, Session};
pub use stats::LedgerStats;
pub use status::Status;
pub use traits::{LedgerSnapshot, LedgerStore, SnapshotObserver};
