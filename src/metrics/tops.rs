//! Selectors over the tops export
//!
//! The tops export mixes destination rankings with individual extreme
//! flights under one `record_type` tag; these helpers split and order them,
//! with a fallback that derives destination rankings from the routes
//! collection when the export carries none.

use std::collections::HashMap;

use crate::data::{RouteMetric, TopRecord, TopRecordType};

/// A ranked destination row for the overview screen
#[derive(Debug, Clone, PartialEq)]
pub struct TopDestination {
    pub destination_city: String,
    pub destination_country: String,
    pub total_flights: u64,
    pub avg_delay_minutes: f64,
    pub rank: u32,
}

/// Ranked destinations from the tops export, rank-ordered
///
/// Rows missing a city or country are dropped rather than rendered blank.
pub fn top_destinations(tops: &[TopRecord]) -> Vec<TopDestination> {
    let mut destinations: Vec<TopDestination> = tops
        .iter()
        .filter(|record| record.record_type == TopRecordType::TopDestination)
        .filter_map(|record| {
            let city = record.destination_city.clone()?;
            let country = record.destination_country.clone()?;
            if city.is_empty() || country.is_empty() {
                return None;
            }
            Some(TopDestination {
                destination_city: city,
                destination_country: country,
                total_flights: record.total_flights.unwrap_or(0),
                avg_delay_minutes: record.avg_delay_minutes.unwrap_or(0.0),
                rank: record.rank,
            })
        })
        .collect();
    destinations.sort_by_key(|destination| destination.rank);
    destinations
}

/// Derives a destination ranking from the routes collection
///
/// Groups by destination city+country, summing flights and weighting the
/// mean delay by flights, then ranks by volume. Used when the tops export
/// has no destination rows.
pub fn top_destinations_from_routes(routes: &[RouteMetric], limit: usize) -> Vec<TopDestination> {
    let mut order = Vec::new();
    let mut grouped: HashMap<String, TopDestination> = HashMap::new();

    for route in routes {
        if route.destination_city.is_empty() || route.destination_country.is_empty() {
            continue;
        }
        let key = format!("{}__{}", route.destination_city, route.destination_country);
        match grouped.get_mut(&key) {
            Some(existing) => {
                let total = existing.total_flights + route.total_flights;
                let weighted = existing.avg_delay_minutes * existing.total_flights as f64
                    + route.avg_delay_minutes * route.total_flights as f64;
                existing.total_flights = total;
                existing.avg_delay_minutes = if total > 0 {
                    weighted / total as f64
                } else {
                    0.0
                };
            }
            None => {
                order.push(key.clone());
                grouped.insert(
                    key,
                    TopDestination {
                        destination_city: route.destination_city.clone(),
                        destination_country: route.destination_country.clone(),
                        total_flights: route.total_flights,
                        avg_delay_minutes: route.avg_delay_minutes,
                        rank: 0,
                    },
                );
            }
        }
    }

    let mut destinations: Vec<TopDestination> = order
        .into_iter()
        .filter_map(|key| grouped.remove(&key))
        .collect();
    destinations.sort_by(|a, b| b.total_flights.cmp(&a.total_flights));
    destinations.truncate(limit);
    for (index, destination) in destinations.iter_mut().enumerate() {
        destination.rank = index as u32 + 1;
    }
    destinations
}

/// The worst individual delays, rank-ordered
pub fn top_delays(tops: &[TopRecord]) -> Vec<&TopRecord> {
    records_of_type(tops, TopRecordType::TopDelay)
}

/// The earliest individual departures, rank-ordered
pub fn top_earlies(tops: &[TopRecord]) -> Vec<&TopRecord> {
    records_of_type(tops, TopRecordType::TopEarly)
}

fn records_of_type(tops: &[TopRecord], kind: TopRecordType) -> Vec<&TopRecord> {
    let mut records: Vec<&TopRecord> = tops
        .iter()
        .filter(|record| record.record_type == kind)
        .collect();
    records.sort_by_key(|record| record.rank);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{sample_dashboard, sample_routes};

    #[test]
    fn test_top_destinations_rank_ordered() {
        let data = sample_dashboard();
        let destinations = top_destinations(&data.tops);
        assert_eq!(destinations.len(), 3);
        assert_eq!(destinations[0].destination_city, "Santiago");
        let ranks: Vec<u32> = destinations.iter().map(|d| d.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_top_destinations_drop_incomplete_rows() {
        let mut data = sample_dashboard();
        // Blank out a destination city; the row should disappear
        if let Some(record) = data
            .tops
            .iter_mut()
            .find(|r| r.record_type == TopRecordType::TopDestination)
        {
            record.destination_city = None;
        }
        let destinations = top_destinations(&data.tops);
        assert_eq!(destinations.len(), 2);
    }

    #[test]
    fn test_top_destinations_from_routes_groups_and_ranks() {
        let routes = sample_routes();
        let destinations = top_destinations_from_routes(&routes, 10);

        // Santiago aggregates AEP (AR+LA+JA) and MDZ (LA) legs
        assert_eq!(destinations[0].destination_city, "Santiago");
        assert_eq!(destinations[0].total_flights, 412 + 524 + 186 + 186);
        assert_eq!(destinations[0].rank, 1);

        // Weighted mean, not a plain mean of the per-route averages
        let expected = (412.0 * 19.0 + 524.0 * 12.0 + 186.0 * 32.0 + 186.0 * 11.0)
            / (412.0 + 524.0 + 186.0 + 186.0);
        assert!((destinations[0].avg_delay_minutes - expected).abs() < 1e-9);
    }

    #[test]
    fn test_top_destinations_from_routes_respects_limit() {
        let routes = sample_routes();
        let destinations = top_destinations_from_routes(&routes, 2);
        assert_eq!(destinations.len(), 2);
        assert!(destinations[0].total_flights >= destinations[1].total_flights);
    }

    #[test]
    fn test_top_delays_sorted_by_rank() {
        let data = sample_dashboard();
        let delays = top_delays(&data.tops);
        assert_eq!(delays.len(), 2);
        assert_eq!(delays[0].flight_number.as_deref(), Some("AR1134"));
        assert!(delays[0].rank <= delays[1].rank);
    }

    #[test]
    fn test_top_earlies_only_contain_early_records() {
        let data = sample_dashboard();
        let earlies = top_earlies(&data.tops);
        assert_eq!(earlies.len(), 2);
        assert!(earlies
            .iter()
            .all(|record| record.record_type == TopRecordType::TopEarly));
        assert!(earlies[0].delay_minutes.unwrap_or(0.0) < 0.0);
    }

    #[test]
    fn test_selectors_on_empty_input() {
        assert!(top_destinations(&[]).is_empty());
        assert!(top_delays(&[]).is_empty());
        assert!(top_destinations_from_routes(&[], 10).is_empty());
    }
}
