//! Detached snapshot delivery

use crate::{BackupConfig, BackupMetadata, BackupMetrics, BackupSink};
use postledger_domain::{LedgerSnapshot, SnapshotObserver};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Ships every ledger snapshot to the configured sink
///
/// The notifier is called synchronously by the store (usually on a blocking
/// thread), so it spawns each delivery on the runtime captured at
/// construction and returns immediately. Deliveries are attempted once and
/// may overlap.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use postledger_backup::{BackupConfig, BackupError, BackupMetadata, BackupNotifier, BackupSink};
/// use postledger_domain::LedgerSnapshot;
/// use postledger_store::SqliteLedger;
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// /// Copies snapshots into `<root>/<target>/`
/// struct DirectorySink {
///     root: PathBuf,
/// }
///
/// #[async_trait]
/// impl BackupSink for DirectorySink {
///     async fn send_snapshot(
///         &self,
///         target: &str,
///         snapshot: LedgerSnapshot,
///         _metadata: BackupMetadata,
///     ) -> Result<(), BackupError> {
///         let dir = self.root.join(target);
///         tokio::fs::create_dir_all(&dir)
///             .await
///             .map_err(|e| BackupError::Transport(e.to_string()))?;
///         tokio::fs::write(dir.join(&snapshot.filename), &snapshot.bytes)
///             .await
///             .map_err(|e| BackupError::Transport(e.to_string()))
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let data = tempfile::tempdir()?;
///     let sink = Arc::new(DirectorySink {
///         root: data.path().join("backups"),
///     });
///
///     let notifier = BackupNotifier::new(sink, BackupConfig::new("archive"), tokio::runtime::Handle::current());
///     assert!(notifier.config().is_enabled());
///
///     let _ledger = SqliteLedger::new(data.path().join("ledgers"))?.with_observer(Arc::new(notifier));
///     Ok(())
/// }
/// ```
pub struct BackupNotifier {
    sink: Arc<dyn BackupSink>,
    config: BackupConfig,
    handle: Handle,
    metrics: Arc<BackupMetrics>,
}

impl BackupNotifier {
    /// Create a notifier delivering through `sink` on the runtime behind `handle`
    pub fn new(sink: Arc<dyn BackupSink>, config: BackupConfig, handle: Handle) -> Self {
        if let Some(target) = config.target() {
            tracing::info!("Backups enabled (target: {})", target);
        } else {
            tracing::info!("Backups disabled");
        }

        Self {
            sink,
            config,
            handle,
            metrics: Arc::new(BackupMetrics::new()),
        }
    }

    /// Shared delivery counters
    pub fn metrics(&self) -> Arc<BackupMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The active configuration
    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Spawn a delivery task for `snapshot`
    ///
    /// Returns `None` when backups are disabled. The handle is only useful
    /// for tests; production callers drop it.
    pub fn dispatch(&self, snapshot: LedgerSnapshot) -> Option<JoinHandle<()>> {
        let Some(target) = self.config.target().map(str::to_string) else {
            tracing::debug!("Backups disabled, dropping snapshot for user {}", snapshot.user);
            return None;
        };

        let sink = Arc::clone(&self.sink);
        let metrics = Arc::clone(&self.metrics);
        let metadata = BackupMetadata::for_snapshot(&snapshot);
        let user = snapshot.user;

        metrics.record_dispatch();
        tracing::debug!("Dispatching backup {} for user {}", snapshot.filename, user);

        Some(self.handle.spawn(async move {
            match sink.send_snapshot(&target, snapshot, metadata).await {
                Ok(()) => {
                    metrics.record_delivery();
                    tracing::info!("Backup for user {} delivered", user);
                }
                Err(e) => {
                    metrics.record_failure();
                    tracing::error!("Backup for user {} failed: {}", user, e);
                }
            }
        }))
    }
}

impl SnapshotObserver for BackupNotifier {
    fn ledger_changed(&self, snapshot: LedgerSnapshot) {
        // Detached; failures surface only in logs and metrics
        let _ = self.dispatch(snapshot);
    }
}
