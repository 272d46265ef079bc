//! Route filtering and weighted aggregation
//!
//! Filters compare exactly after normalization: airport and airline codes
//! uppercase-trimmed, country and city names lowercase-trimmed. Aggregation
//! weights each route's average delay by its flight count.

use std::collections::HashSet;

use crate::data::RouteMetric;

/// Filter criteria for the routes screen; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    /// Origin airport code
    pub origin: Option<String>,
    /// Destination country
    pub country: Option<String>,
    /// Destination city
    pub city: Option<String>,
    /// Airline code
    pub airline: Option<String>,
}

impl RouteFilter {
    /// Whether any criterion is active
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
            || self.country.is_some()
            || self.city.is_some()
            || self.airline.is_some()
    }
}

/// An origin airport option for the filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOrigin {
    pub code: String,
    pub name: String,
    pub city: String,
}

/// An airline option for the filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAirline {
    pub code: String,
    pub name: String,
}

/// Totals over a set of routes, with a flight-weighted mean delay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteTotals {
    pub total_flights: u64,
    pub total_on_time: u64,
    pub total_delayed: u64,
    pub total_cancelled: u64,
    pub avg_delay_minutes: f64,
}

impl RouteTotals {
    /// On-time share of total flights, 0 when there are no flights
    pub fn on_time_percentage(&self) -> f64 {
        percentage(self.total_on_time, self.total_flights)
    }

    /// Cancelled share of total flights, 0 when there are no flights
    pub fn cancellation_rate(&self) -> f64 {
        percentage(self.total_cancelled, self.total_flights)
    }
}

/// Share of `part` in `total` as a percentage, 0 when `total` is 0
pub fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

fn normalize_code(value: &str) -> String {
    value.trim().to_uppercase()
}

fn matches_code(value: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(wanted) => normalize_code(value) == normalize_code(wanted),
        None => true,
    }
}

fn matches_text(value: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(wanted) => normalize_text(value) == normalize_text(wanted),
        None => true,
    }
}

/// Selects the routes matching every active criterion
pub fn filter_routes<'a>(routes: &'a [RouteMetric], filter: &RouteFilter) -> Vec<&'a RouteMetric> {
    routes
        .iter()
        .filter(|route| matches_code(&route.origin_airport_code, filter.origin.as_deref()))
        .filter(|route| matches_text(&route.destination_country, filter.country.as_deref()))
        .filter(|route| matches_text(&route.destination_city, filter.city.as_deref()))
        .filter(|route| matches_code(&route.airline_code, filter.airline.as_deref()))
        .collect()
}

/// Reduces routes to totals with a flight-weighted average delay
///
/// `avg_delay_minutes` is `sum(avg_delay_i * flights_i) / sum(flights_i)`,
/// and 0 (never NaN) when the input is empty or has no flights.
pub fn aggregate_routes<'a, I>(routes: I) -> RouteTotals
where
    I: IntoIterator<Item = &'a RouteMetric>,
{
    let mut totals = RouteTotals::default();
    let mut weighted_delay = 0.0;

    for route in routes {
        totals.total_flights += route.total_flights;
        totals.total_on_time += route.total_on_time_flights;
        totals.total_delayed += route.total_delayed_flights;
        totals.total_cancelled += route.total_cancelled_flights;
        weighted_delay += route.avg_delay_minutes * route.total_flights as f64;
    }

    totals.avg_delay_minutes = if totals.total_flights > 0 {
        weighted_delay / totals.total_flights as f64
    } else {
        0.0
    };

    totals
}

/// Distinct origin airports, in first-seen order
pub fn unique_origins(routes: &[RouteMetric]) -> Vec<RouteOrigin> {
    let mut seen = HashSet::new();
    let mut origins = Vec::new();
    for route in routes {
        let code = normalize_code(&route.origin_airport_code);
        if code.is_empty() || !seen.insert(code.clone()) {
            continue;
        }
        origins.push(RouteOrigin {
            code,
            name: route.origin_airport_name.clone(),
            city: route.origin_city.clone(),
        });
    }
    origins
}

/// Distinct destination countries for the given origin, sorted
pub fn unique_countries(routes: &[RouteMetric], origin: Option<&str>) -> Vec<String> {
    let mut countries: Vec<String> = routes
        .iter()
        .filter(|route| matches_code(&route.origin_airport_code, origin))
        .map(|route| route.destination_country.trim().to_string())
        .filter(|country| !country.is_empty())
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

/// Distinct destination cities for the given origin and country, sorted
pub fn unique_cities(
    routes: &[RouteMetric],
    origin: Option<&str>,
    country: Option<&str>,
) -> Vec<String> {
    let mut cities: Vec<String> = routes
        .iter()
        .filter(|route| matches_code(&route.origin_airport_code, origin))
        .filter(|route| matches_text(&route.destination_country, country))
        .map(|route| route.destination_city.trim().to_string())
        .filter(|city| !city.is_empty())
        .collect();
    cities.sort();
    cities.dedup();
    cities
}

/// Distinct airlines serving the narrowed route set, in first-seen order
pub fn unique_airlines(
    routes: &[RouteMetric],
    origin: Option<&str>,
    country: Option<&str>,
    city: Option<&str>,
) -> Vec<RouteAirline> {
    let mut seen = HashSet::new();
    let mut airlines = Vec::new();
    for route in routes
        .iter()
        .filter(|route| matches_code(&route.origin_airport_code, origin))
        .filter(|route| matches_text(&route.destination_country, country))
        .filter(|route| matches_text(&route.destination_city, city))
    {
        if route.airline_code.is_empty() || !seen.insert(route.airline_code.clone()) {
            continue;
        }
        airlines.push(RouteAirline {
            code: route.airline_code.clone(),
            name: route.airline_name.clone(),
        });
    }
    airlines
}

/// One airline's standing in the punctuality ranking
#[derive(Debug, Clone, PartialEq)]
pub struct AirlineStanding {
    pub code: String,
    pub name: String,
    pub total_flights: u64,
    pub on_time_percentage: f64,
    pub avg_delay_minutes: f64,
}

/// Groups routes by airline and ranks them best-first by on-time share
///
/// Percentages recompute from the summed counters; delays are
/// flight-weighted means, matching `aggregate_routes`.
pub fn airline_rankings(routes: &[RouteMetric], limit: usize) -> Vec<AirlineStanding> {
    struct Acc {
        name: String,
        total_flights: u64,
        on_time_flights: u64,
        weighted_delay: f64,
    }

    let mut order = Vec::new();
    let mut by_code: std::collections::HashMap<String, Acc> = std::collections::HashMap::new();

    for route in routes {
        if route.airline_code.is_empty() {
            continue;
        }
        let entry = by_code.entry(route.airline_code.clone()).or_insert_with(|| {
            order.push(route.airline_code.clone());
            Acc {
                name: route.airline_name.clone(),
                total_flights: 0,
                on_time_flights: 0,
                weighted_delay: 0.0,
            }
        });
        entry.total_flights += route.total_flights;
        entry.on_time_flights += route.total_on_time_flights;
        entry.weighted_delay += route.avg_delay_minutes * route.total_flights as f64;
    }

    let mut standings: Vec<AirlineStanding> = order
        .into_iter()
        .filter_map(|code| {
            let acc = by_code.remove(&code)?;
            Some(AirlineStanding {
                code,
                name: acc.name,
                total_flights: acc.total_flights,
                on_time_percentage: percentage(acc.on_time_flights, acc.total_flights),
                avg_delay_minutes: if acc.total_flights > 0 {
                    acc.weighted_delay / acc.total_flights as f64
                } else {
                    0.0
                },
            })
        })
        .collect();

    standings.sort_by(|a, b| b.on_time_percentage.total_cmp(&a.on_time_percentage));
    standings.truncate(limit);
    standings
}
