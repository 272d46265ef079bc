//! Background data refresh system
//!
//! Watches the snapshot store for manifest expiry and refetches in the
//! background, communicating updates to the main application through a
//! tokio channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::cache::DashboardStore;
use crate::data::DashboardData;

/// Messages sent from the background refresher to the main app
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A fresh snapshot replaced the expired one
    DashboardUpdated(Arc<DashboardData>),
    /// An error occurred during refresh
    RefreshError(String),
    /// A refresh check started
    RefreshStarted,
    /// A refresh check completed
    RefreshCompleted,
}

/// Configuration for the background refresher
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// How often to check whether the snapshot has expired
    pub check_interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(300), // 5 minutes
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresher
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the background refresher over a shared snapshot store
    ///
    /// Each tick checks whether the held snapshot has outlived its manifest
    /// window; only then does the store refetch. Updates arrive via the
    /// `receiver` channel.
    pub fn spawn(config: RefreshConfig, store: Arc<DashboardStore>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let check_interval = config.check_interval;
            let tx = msg_tx.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(check_interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let _ = tx.send(RefreshMessage::RefreshStarted).await;

                            match store.refresh_if_expired().await {
                                Ok(Some(data)) => {
                                    let _ = tx.send(RefreshMessage::DashboardUpdated(data)).await;
                                }
                                Ok(None) => {}
                                Err(error) => {
                                    let _ = tx
                                        .send(RefreshMessage::RefreshError(error.to_string()))
                                        .await;
                                }
                            }

                            let _ = tx.send(RefreshMessage::RefreshCompleted).await;
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background refresher
    #[allow(dead_code)]
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for pending refresh messages without blocking
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheManager, DASHBOARD_CACHE_KEY};
    use crate::data::{sample::sample_dashboard, DashboardClient, ManifestClient};
    use tempfile::TempDir;

    fn store_with_fresh_disk(dir: &TempDir) -> Arc<DashboardStore> {
        let disk = CacheManager::with_dir(dir.path().to_path_buf());
        let data = sample_dashboard();
        disk.write(DASHBOARD_CACHE_KEY, &data, data.expires_at)
            .expect("seed write");
        let client =
            DashboardClient::new(ManifestClient::with_url("http://127.0.0.1:1/manifest.json"));
        Arc::new(DashboardStore::new(client, Some(disk)))
    }

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshConfig::default();
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert!(config.enabled);
    }

    #[tokio::test]
    async fn test_refresh_handle_spawn_disabled() {
        let dir = TempDir::new().expect("temp dir");
        let config = RefreshConfig {
            enabled: false,
            ..Default::default()
        };

        let mut handle = RefreshHandle::spawn(config, store_with_fresh_disk(&dir));

        // With refresh disabled, there should be no messages
        assert!(try_recv(&mut handle).is_none());
    }

    #[tokio::test]
    async fn test_valid_snapshot_produces_no_update() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_with_fresh_disk(&dir);
        // Populate the memory tier so the refresher sees a valid snapshot
        store.get().await.expect("initial read");

        let config = RefreshConfig {
            check_interval: Duration::from_millis(10),
            enabled: true,
        };
        let mut handle = RefreshHandle::spawn(config, store);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut saw_update = false;
        let mut saw_tick = false;
        while let Some(message) = try_recv(&mut handle) {
            match message {
                RefreshMessage::DashboardUpdated(_) => saw_update = true,
                RefreshMessage::RefreshStarted => saw_tick = true,
                _ => {}
            }
        }
        assert!(saw_tick, "refresher should have ticked at least once");
        assert!(!saw_update, "valid snapshot must not refetch");
    }
}
