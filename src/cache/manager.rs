//! Cache manager for persisting dashboard snapshots to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files
//! stamped with the manifest's expiry timestamp, supporting graceful
//! degradation when the export feed is unavailable.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires (the manifest's expiry)
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    #[allow(dead_code)]
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache
/// directory (`~/.cache/demoras/` on Linux). Entries carry the expiry
/// timestamp of the manifest they were fetched under; expired entries are
/// still returned (with `is_expired = true`) so stale data can render when
/// the feed is down.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using an XDG-compliant cache directory
    ///
    /// Uses `~/.cache/demoras/` on Linux, or the equivalent XDG path on
    /// other platforms. Returns `None` if the cache directory cannot be
    /// determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "demoras")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes data to the cache, valid until the given expiry
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the cache entry (e.g., "dashboard")
    /// * `data` - The data to cache (must implement Serialize)
    /// * `expires_at` - Validity deadline, normally the manifest expiry
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        expires_at: DateTime<Utc>,
    ) -> std::io::Result<()> {
        self.ensure_dir()?;

        let entry = CacheEntry {
            data,
            cached_at: Utc::now(),
            expires_at,
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(key), json)
    }

    /// Reads data from the cache
    ///
    /// Returns `None` if the cache entry doesn't exist or cannot be parsed.
    /// Returns `Some(CachedData)` with `is_expired = true` if the entry
    /// exists but its manifest window has passed, allowing for graceful
    /// degradation when the feed is unavailable.
    ///
    /// # Arguments
    /// * `key` - The cache key to read
    ///
    /// # Returns
    /// * `Some(CachedData<T>)` if the entry exists and can be parsed
    /// * `None` if the entry doesn't exist or parsing fails
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let path = self.cache_path(key);
        let content = fs::read_to_string(path).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        let now = Utc::now();
        let is_expired = now > entry.expires_at;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn in_one_hour() -> DateTime<Utc> {
        Utc::now() + Duration::hours(1)
    }

    #[test]
    fn test_write_creates_file_in_cache_directory() {
        let (cache, temp_dir) = create_test_cache();
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        cache
            .write("test_key", &data, in_one_hour())
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join("test_key.json");
        assert!(expected_path.exists(), "Cache file should exist");

        // Verify the file contains valid JSON
        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert!(content.contains("\"name\""));
        assert!(content.contains("\"test\""));
        assert!(content.contains("\"value\""));
        assert!(content.contains("42"));
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();

        let result: Option<CachedData<TestData>> = cache.read("nonexistent_key");

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_read_returns_data_with_is_expired_false_for_fresh_cache() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "fresh".to_string(),
            value: 100,
        };

        cache
            .write("fresh_key", &data, in_one_hour())
            .expect("Write should succeed");

        let result: CachedData<TestData> = cache.read("fresh_key").expect("Should read fresh cache");

        assert_eq!(result.data, data);
        assert!(!result.is_expired, "Fresh cache should not be expired");
    }

    #[test]
    fn test_read_returns_data_with_is_expired_true_for_past_expiry() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "expired".to_string(),
            value: 0,
        };

        // Write with an expiry already in the past
        cache
            .write("expired_key", &data, Utc::now() - Duration::hours(1))
            .expect("Write should succeed");

        let result: CachedData<TestData> =
            cache.read("expired_key").expect("Should read expired cache");

        assert_eq!(result.data, data);
        assert!(result.is_expired, "Entry past its expiry should be expired");
    }

    #[test]
    fn test_cache_survives_serialization_roundtrip() {
        let (cache, _temp_dir) = create_test_cache();
        let original = TestData {
            name: "roundtrip".to_string(),
            value: 12345,
        };

        cache
            .write("roundtrip_key", &original, in_one_hour())
            .expect("Write should succeed");

        let result: CachedData<TestData> = cache.read("roundtrip_key").expect("Should read cache");

        assert_eq!(result.data, original, "Data should survive roundtrip");
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = CacheManager::with_dir(nested_path.clone());

        let data = TestData {
            name: "nested".to_string(),
            value: 1,
        };

        cache
            .write("nested_key", &data, in_one_hour())
            .expect("Write should succeed");

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(
            nested_path.join("nested_key.json").exists(),
            "Cache file should exist"
        );
    }

    #[test]
    fn test_cached_at_timestamp_is_recorded() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "timestamp".to_string(),
            value: 999,
        };

        let before = Utc::now();
        cache
            .write("timestamp_key", &data, in_one_hour())
            .expect("Write should succeed");
        let after = Utc::now();

        let result: CachedData<TestData> = cache.read("timestamp_key").expect("Should read cache");

        assert!(
            result.cached_at >= before,
            "cached_at should be after write started"
        );
        assert!(
            result.cached_at <= after,
            "cached_at should be before write finished"
        );
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(cache) = CacheManager::new() {
            let path_str = cache.cache_dir.to_string_lossy();
            assert!(
                path_str.contains("demoras"),
                "Cache path should contain project name"
            );
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[test]
    fn test_overwrite_existing_cache() {
        let (cache, _temp_dir) = create_test_cache();
        let data1 = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let data2 = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache
            .write("overwrite_key", &data1, in_one_hour())
            .expect("First write should succeed");
        cache
            .write("overwrite_key", &data2, in_one_hour())
            .expect("Second write should succeed");

        let result: CachedData<TestData> = cache.read("overwrite_key").expect("Should read cache");

        assert_eq!(result.data, data2, "Cache should contain latest data");
    }
}
