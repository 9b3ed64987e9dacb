//! Error types for backup delivery

use thiserror::Error;

/// Errors that can occur while shipping a snapshot
#[derive(Error, Debug)]
pub enum BackupError {
    /// The sink could not deliver the snapshot
    #[error("Transport error: {0}")]
    Transport(String),
}
