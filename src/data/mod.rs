//! Core data models for the Demoras CLI
//!
//! This module contains the wire types for the punctuality exports consumed
//! by the application: the manifest, the per-collection records, and the
//! merged dashboard snapshot.

pub mod exports;
pub mod manifest;
pub mod sample;

pub use exports::{DashboardClient, ExportError};
pub use manifest::{ManifestClient, ManifestError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Manifest document listing the export URLs and their shared validity window
///
/// The manifest governs cache validity for every dependent collection: a
/// snapshot fetched under one manifest is valid until `expires_at`, with no
/// per-collection expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// When the manifest (and its signed URLs) were generated
    pub generated_at: DateTime<Utc>,
    /// When the signed URLs and any data fetched through them expire
    pub expires_at: DateTime<Utc>,
    /// Validity window in days, when the publisher includes it
    #[serde(default)]
    pub expiration_days: Option<u32>,
    /// Resolved or signed URLs for each export collection
    pub urls: ManifestUrls,
}

/// Per-collection URLs referenced by the manifest
///
/// URLs may be absolute (signed object-storage URLs) or relative to the
/// manifest location (static-site exports).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestUrls {
    pub headline: String,
    pub airline_breakdown: String,
    pub tops: String,
    pub bucket_distribution: String,
    pub daily_status: String,
    pub routes_metrics: String,
    /// Gate analysis is a newer export and may be absent from older manifests
    #[serde(default)]
    pub gates_analysis: Option<String>,
}

/// Headline KPIs for the whole lookback window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineMetrics {
    pub total_flights: u64,
    pub cancelled_flights: u64,
    pub delayed_over_30min: u64,
    pub delayed_over_45min: u64,
    pub avg_delay_minutes: f64,
    pub lookback_days: u32,
    /// Warehouse refresh timestamp, passed through verbatim
    #[serde(default)]
    pub dbt_updated_at: String,
}

impl Default for HeadlineMetrics {
    fn default() -> Self {
        Self {
            total_flights: 0,
            cancelled_flights: 0,
            delayed_over_30min: 0,
            delayed_over_45min: 0,
            avg_delay_minutes: 0.0,
            lookback_days: 0,
            dbt_updated_at: String::new(),
        }
    }
}

/// Per-airline aggregate with delay-bucket counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirlineBreakdown {
    pub airline_name: String,
    pub total_flights: u64,
    pub cancelled_flights: u64,
    pub avg_delay_minutes: f64,
    /// Passenger-hours lost to delays over the window
    pub hours_lost: f64,
    pub delay_over_45: u64,
    pub delay_45_30: u64,
    pub delay_30_15: u64,
    pub delay_15_0: u64,
    pub on_time_or_early: u64,
    #[serde(default)]
    pub dbt_updated_at: String,
}

/// Kind of row in the tops export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopRecordType {
    /// Ranked destination by flight volume
    TopDestination,
    /// Worst individual delays
    TopDelay,
    /// Earliest individual departures
    TopEarly,
    /// Forward-compatible catch-all for record types this build doesn't know
    #[serde(other)]
    Unknown,
}

/// A row from the tops export
///
/// Destination rows populate the destination fields; delay/early rows
/// populate the per-flight fields. All payload fields are optional on the
/// wire, so selectors must tolerate missing values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopRecord {
    pub record_type: TopRecordType,
    pub rank: u32,
    #[serde(default)]
    pub destination_city: Option<String>,
    #[serde(default)]
    pub destination_country: Option<String>,
    #[serde(default)]
    pub total_flights: Option<u64>,
    #[serde(default)]
    pub avg_delay_minutes: Option<f64>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub origin_airport_code: Option<String>,
    #[serde(default)]
    pub destination_airport_code: Option<String>,
    #[serde(default)]
    pub delay_minutes: Option<f64>,
    #[serde(default)]
    pub scheduled_departure_time: Option<String>,
    #[serde(default)]
    pub actual_departure_time: Option<String>,
}

/// One delay bucket (e.g. "cancelled", "delay_15_0") with its flight count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: String,
    pub total_flights: u64,
}

/// Daily aggregate for the trend series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStatus {
    pub flight_date: NaiveDate,
    pub total_flights: u64,
    pub cancelled_flights: u64,
    pub delayed_over_30min: u64,
    pub avg_delay_minutes: f64,
    #[serde(default)]
    pub top_destination_city: Option<String>,
    #[serde(default)]
    pub top_destination_country: Option<String>,
    #[serde(default)]
    pub dbt_updated_at: String,
}

/// Aggregate metrics for one origin/destination/airline route over a window
///
/// Immutable once fetched; percentages are precomputed server-side but the
/// aggregator recomputes them from the counters when combining rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMetric {
    pub origin_airport_code: String,
    pub origin_airport_name: String,
    pub origin_city: String,
    pub origin_country: String,
    pub destination_airport_code: String,
    pub destination_airport_name: String,
    pub destination_city: String,
    pub destination_country: String,
    pub airline_code: String,
    pub airline_name: String,
    pub window_start_date: NaiveDate,
    pub window_end_date: NaiveDate,
    pub total_flights: u64,
    pub total_completed_flights: u64,
    pub total_cancelled_flights: u64,
    pub total_delayed_flights: u64,
    pub total_on_time_flights: u64,
    pub avg_delay_minutes: f64,
    pub on_time_percentage: f64,
    pub delayed_percentage: f64,
    pub cancellation_rate: f64,
}

/// Number of hourly slots in a gate's time distribution
pub const HOURS_PER_DAY: usize = 24;

/// Per-gate aggregate with an hourly activity distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateMetrics {
    pub gate: String,
    pub total_flights: u64,
    pub avg_delay_minutes: f64,
    pub delayed_flights: u64,
    pub on_time_flights: u64,
    pub on_time_percentage: f64,
    pub max_delay_minutes: f64,
    /// Flight count per hour of day; index = hour (0-23)
    pub time_distribution: Vec<u64>,
}

impl GateMetrics {
    /// Returns the hourly distribution as a fixed 24-slot array
    ///
    /// Exports are expected to carry exactly 24 entries; short arrays pad
    /// with zeros and long arrays truncate rather than failing the load.
    pub fn hourly_distribution(&self) -> [u64; HOURS_PER_DAY] {
        let mut hours = [0u64; HOURS_PER_DAY];
        for (slot, count) in hours.iter_mut().zip(self.time_distribution.iter()) {
            *slot = *count;
        }
        hours
    }
}

/// The merged dashboard snapshot: every collection plus the manifest window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub headline: HeadlineMetrics,
    pub airlines: Vec<AirlineBreakdown>,
    pub tops: Vec<TopRecord>,
    pub buckets: Vec<BucketCount>,
    pub daily_status: Vec<DailyStatus>,
    pub routes: Vec<RouteMetric>,
    pub gates: Vec<GateMetrics>,
    /// Carried over from the manifest that produced this snapshot
    pub generated_at: DateTime<Utc>,
    /// Validity deadline inherited from the manifest
    pub expires_at: DateTime<Utc>,
}

impl DashboardData {
    /// Whether the snapshot's manifest window has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
