//! Configuration for backup delivery

use serde::{Deserialize, Serialize};

/// Configuration for the backup notifier
///
/// # Examples
///
/// ```
/// use postledger_backup::BackupConfig;
///
/// assert!(!BackupConfig::default().is_enabled());
/// assert!(BackupConfig::new("-1001234567890").is_enabled());
/// assert!(!BackupConfig::new("  ").is_enabled());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Sink identifier (for Telegram, the chat id or `@channel`)
    /// Default: none, backups disabled
    #[serde(default)]
    pub target: Option<String>,
}

impl BackupConfig {
    /// Configuration shipping to `target`
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
        }
    }

    /// Configuration with backups turned off
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The configured target, ignoring blank values
    pub fn target(&self) -> Option<&str> {
        self.target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Whether snapshots should be shipped at all
    pub fn is_enabled(&self) -> bool {
        self.target().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        let config = BackupConfig::default();
        assert_eq!(config, BackupConfig::disabled());
        assert!(config.target().is_none());
    }

    #[test]
    fn test_target_is_trimmed() {
        let config = BackupConfig::new(" @backups ");
        assert_eq!(config.target(), Some("@backups"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = BackupConfig::new("-100200300");
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: BackupConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);

        let empty: BackupConfig = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_enabled());
    }
}
