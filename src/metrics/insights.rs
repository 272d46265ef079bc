//! Derived insight calculations for the overview screen
//!
//! Small reductions over the gates, tops, buckets and daily collections:
//! the busiest hour of the day, the most punctual gate, the worst recorded
//! delay, fleet-wide gate stats and the trend axis bounds.

use crate::data::{AirlineBreakdown, BucketCount, DailyStatus, GateMetrics, TopRecord, HOURS_PER_DAY};

use super::tops::top_delays;

/// Minimum traffic for a gate to qualify for the punctuality highlight
const BEST_GATE_MIN_FLIGHTS: u64 = 10;

/// The hour of day with the most gate activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakHour {
    /// Hour of day (0-23)
    pub hour: usize,
    /// Flights concentrated in that hour across all gates
    pub flights: u64,
}

/// Finds the hour with the highest summed activity across all gates
///
/// Returns `None` when there are no gates or no recorded activity.
pub fn peak_hour(gates: &[GateMetrics]) -> Option<PeakHour> {
    let mut hourly_totals = [0u64; HOURS_PER_DAY];
    for gate in gates {
        for (hour, count) in gate.hourly_distribution().iter().enumerate() {
            hourly_totals[hour] += count;
        }
    }

    let (hour, &flights) = hourly_totals
        .iter()
        .enumerate()
        .max_by_key(|(_, &count)| count)?;
    if flights == 0 {
        return None;
    }
    Some(PeakHour { hour, flights })
}

/// The gate with the best on-time percentage among gates with real traffic
pub fn best_gate(gates: &[GateMetrics]) -> Option<&GateMetrics> {
    gates
        .iter()
        .filter(|gate| gate.total_flights > BEST_GATE_MIN_FLIGHTS)
        .max_by(|a, b| a.on_time_percentage.total_cmp(&b.on_time_percentage))
}

/// The worst recorded individual delay (first-ranked top_delay row)
pub fn worst_delay(tops: &[TopRecord]) -> Option<&TopRecord> {
    top_delays(tops).first().copied()
}

/// Fleet-wide means across all gates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateFleetStats {
    /// Mean of the per-gate average delays, one decimal
    pub avg_delay_minutes: f64,
    /// Total flights across all gates
    pub total_flights: u64,
    /// Mean of the per-gate on-time percentages, one decimal
    pub avg_on_time_percentage: f64,
}

/// Averages per-gate figures across the fleet; all-zero when empty
pub fn gate_fleet_stats(gates: &[GateMetrics]) -> GateFleetStats {
    if gates.is_empty() {
        return GateFleetStats::default();
    }
    let count = gates.len() as f64;
    let avg_delay = gates.iter().map(|g| g.avg_delay_minutes).sum::<f64>() / count;
    let avg_on_time = gates.iter().map(|g| g.on_time_percentage).sum::<f64>() / count;
    GateFleetStats {
        avg_delay_minutes: round1(avg_delay),
        total_flights: gates.iter().map(|g| g.total_flights).sum(),
        avg_on_time_percentage: round1(avg_on_time),
    }
}

/// Axis bounds and mean for the daily delay trend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAxis {
    /// Upper bound: the max delay padded and rounded up to a tens step,
    /// never below 30
    pub max: f64,
    /// Mean delay over the series, one decimal
    pub avg: f64,
}

/// Computes the trend axis from the daily series; `None` when empty
pub fn trend_axis(daily: &[DailyStatus]) -> Option<TrendAxis> {
    if daily.is_empty() {
        return None;
    }
    let values: Vec<f64> = daily.iter().map(|day| day.avg_delay_minutes).collect();
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let rounded_max = ((max + 5.0) / 10.0).ceil() * 10.0;
    Some(TrendAxis {
        max: rounded_max.max(30.0),
        avg: round1(avg),
    })
}

/// The daily series in date order, for rendering the trend left-to-right
pub fn sorted_daily(daily: &[DailyStatus]) -> Vec<&DailyStatus> {
    let mut days: Vec<&DailyStatus> = daily.iter().collect();
    days.sort_by_key(|day| day.flight_date);
    days
}

/// Total flights across all delay buckets
///
/// For a consistent export this equals the headline flight total.
pub fn bucket_total(buckets: &[BucketCount]) -> u64 {
    buckets.iter().map(|bucket| bucket.total_flights).sum()
}

/// Total hours lost to delays and the airline losing the most
pub fn hours_lost(airlines: &[AirlineBreakdown]) -> Option<(f64, &AirlineBreakdown)> {
    let worst = airlines
        .iter()
        .max_by(|a, b| a.hours_lost.total_cmp(&b.hours_lost))?;
    let total = airlines.iter().map(|airline| airline.hours_lost).sum();
    Some((total, worst))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
