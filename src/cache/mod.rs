//! Tiered caching for dashboard snapshots
//!
//! Two tiers: an in-memory slot holding the current snapshot behind an
//! `Arc`, and a persistent JSON file in the XDG cache directory. Both are
//! governed by the single expiry timestamp the manifest carries.

pub mod manager;
pub mod store;

pub use manager::{CacheManager, CachedData};
pub use store::{DashboardStore, DASHBOARD_CACHE_KEY};
