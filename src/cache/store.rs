//! Read-through store for the dashboard snapshot
//!
//! `DashboardStore` front-ends the fetch orchestrator with the two cache
//! tiers. The snapshot moves through EMPTY -> POPULATED and back to EMPTY
//! once a read lands past the manifest expiry; there is no partial
//! invalidation. Readers within the validity window all receive clones of
//! the same `Arc`.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::cache::CacheManager;
use crate::data::{DashboardClient, DashboardData, ExportError};

/// Cache key under which the merged snapshot persists on disk
pub const DASHBOARD_CACHE_KEY: &str = "dashboard";

/// Tiered read-through store for dashboard snapshots
///
/// The slot mutex is held across a fetch, so concurrent readers that miss
/// the cache queue behind one network round and observe the freshly
/// populated slot instead of fetching again.
pub struct DashboardStore {
    /// Memory tier: the current snapshot, if any
    slot: Mutex<Option<Arc<DashboardData>>>,
    /// Persistent tier; absent when no cache directory is available
    disk: Option<CacheManager>,
    /// Fetch orchestrator for cache misses
    client: DashboardClient,
}

impl DashboardStore {
    /// Creates a store around a dashboard client and an optional disk tier
    pub fn new(client: DashboardClient, disk: Option<CacheManager>) -> Self {
        Self {
            slot: Mutex::new(None),
            disk,
            client,
        }
    }

    /// Returns the current snapshot, fetching if both tiers miss
    ///
    /// Read order: memory (if unexpired), then disk (if unexpired, promoting
    /// to memory), then the network. On fetch failure an expired disk entry
    /// is returned as a stale fallback when present.
    pub async fn get(&self) -> Result<Arc<DashboardData>, ExportError> {
        let mut slot = self.slot.lock().await;
        let now = Utc::now();

        if let Some(data) = slot.as_ref() {
            if !data.is_expired(now) {
                return Ok(Arc::clone(data));
            }
            // Read past expiry empties the slot
            *slot = None;
        }

        if let Some(disk) = &self.disk {
            if let Some(cached) = disk.read::<DashboardData>(DASHBOARD_CACHE_KEY) {
                if !cached.is_expired {
                    let data = Arc::new(cached.data);
                    *slot = Some(Arc::clone(&data));
                    return Ok(data);
                }
            }
        }

        self.fetch_into(&mut slot).await
    }

    /// Refetches unconditionally, bypassing both tiers (`--refresh`)
    pub async fn refresh(&self) -> Result<Arc<DashboardData>, ExportError> {
        let mut slot = self.slot.lock().await;
        self.fetch_into(&mut slot).await
    }

    /// Refetches only when the held snapshot has expired
    ///
    /// Used by the background refresher: returns `Ok(None)` when the
    /// current snapshot is still valid.
    pub async fn refresh_if_expired(&self) -> Result<Option<Arc<DashboardData>>, ExportError> {
        let mut slot = self.slot.lock().await;
        if let Some(data) = slot.as_ref() {
            if !data.is_expired(Utc::now()) {
                return Ok(None);
            }
        }
        self.fetch_into(&mut slot).await.map(Some)
    }

    /// Fetches a fresh snapshot into the slot, persisting it to disk
    ///
    /// On failure, an expired disk entry still populates the slot so the
    /// caller can render stale data instead of an error screen.
    async fn fetch_into(
        &self,
        slot: &mut Option<Arc<DashboardData>>,
    ) -> Result<Arc<DashboardData>, ExportError> {
        match self.client.fetch_dashboard().await {
            Ok(data) => {
                if let Some(disk) = &self.disk {
                    let _ = disk.write(DASHBOARD_CACHE_KEY, &data, data.expires_at);
                }
                let data = Arc::new(data);
                *slot = Some(Arc::clone(&data));
                Ok(data)
            }
            Err(fetch_error) => {
                if let Some(disk) = &self.disk {
                    if let Some(cached) = disk.read::<DashboardData>(DASHBOARD_CACHE_KEY) {
                        let data = Arc::new(cached.data);
                        *slot = Some(Arc::clone(&data));
                        return Ok(data);
                    }
                }
                Err(fetch_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample::sample_dashboard, ManifestClient};
    use chrono::Duration;
    use tempfile::TempDir;

    /// A client whose manifest URL refuses connections immediately
    fn unreachable_client() -> DashboardClient {
        DashboardClient::new(ManifestClient::with_url("http://127.0.0.1:1/manifest.json"))
    }

    fn store_with_disk(dir: &TempDir) -> DashboardStore {
        let disk = CacheManager::with_dir(dir.path().to_path_buf());
        DashboardStore::new(unreachable_client(), Some(disk))
    }

    fn seed_disk(dir: &TempDir, data: &DashboardData) {
        CacheManager::with_dir(dir.path().to_path_buf())
            .write(DASHBOARD_CACHE_KEY, data, data.expires_at)
            .expect("seed write should succeed");
    }

    fn expired_sample() -> DashboardData {
        let mut data = sample_dashboard();
        data.generated_at = Utc::now() - Duration::hours(12);
        data.expires_at = Utc::now() - Duration::hours(6);
        data
    }

    #[tokio::test]
    async fn test_get_serves_fresh_disk_entry_without_network() {
        let dir = TempDir::new().expect("temp dir");
        seed_disk(&dir, &sample_dashboard());
        let store = store_with_disk(&dir);

        // The client is unreachable, so success proves the disk tier served
        let data = store.get().await.expect("should serve from disk");
        assert_eq!(data.headline.total_flights, 2824);
    }

    #[tokio::test]
    async fn test_repeated_reads_return_identical_arc() {
        let dir = TempDir::new().expect("temp dir");
        seed_disk(&dir, &sample_dashboard());
        let store = store_with_disk(&dir);

        let first = store.get().await.expect("first read");
        let second = store.get().await.expect("second read");
        assert!(
            Arc::ptr_eq(&first, &second),
            "reads within validity must return the same snapshot"
        );
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_snapshot() {
        let dir = TempDir::new().expect("temp dir");
        seed_disk(&dir, &sample_dashboard());
        let store = store_with_disk(&dir);

        let (a, b) = tokio::join!(store.get(), store.get());
        let (a, b) = (a.expect("read a"), b.expect("read b"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_stale_disk_entry() {
        let dir = TempDir::new().expect("temp dir");
        seed_disk(&dir, &expired_sample());
        let store = store_with_disk(&dir);

        let data = store
            .get()
            .await
            .expect("stale disk data should be served when the feed is down");
        assert!(data.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_fetch_failure_without_cache_surfaces_error() {
        let store = DashboardStore::new(unreachable_client(), None);
        let result = store.get().await;
        assert!(result.is_err(), "no tiers and no network should error");
    }

    #[tokio::test]
    async fn test_refresh_if_expired_keeps_valid_snapshot() {
        let dir = TempDir::new().expect("temp dir");
        seed_disk(&dir, &sample_dashboard());
        let store = store_with_disk(&dir);

        // Populate the memory tier first
        store.get().await.expect("initial read");

        let refreshed = store
            .refresh_if_expired()
            .await
            .expect("check should succeed");
        assert!(refreshed.is_none(), "valid snapshot should not refetch");
    }
}
