//! Client-side aggregation over the fetched collections
//!
//! Pure functions over in-memory records: route filtering and weighted
//! totals, tops selectors, and the derived insight calculations the
//! dashboard screens render. No I/O and no error conditions.

pub mod insights;
pub mod routes;
pub mod tops;

pub use insights::{best_gate, bucket_total, gate_fleet_stats, hours_lost, peak_hour, worst_delay};
pub use routes::{aggregate_routes, filter_routes, RouteFilter, RouteTotals};
pub use tops::{top_delays, top_destinations, top_destinations_from_routes, top_earlies};
