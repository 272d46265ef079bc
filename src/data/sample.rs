//! Bundled sample dataset for demo mode
//!
//! A deterministic snapshot with realistic Argentine routes so the dashboard
//! can run without network access (`--demo`). Also used as a fixture by the
//! aggregation tests.

use chrono::{Duration, NaiveDate, Utc};

use super::{
    AirlineBreakdown, BucketCount, DailyStatus, DashboardData, GateMetrics, HeadlineMetrics,
    RouteMetric, TopRecord, TopRecordType,
};

/// How long the sample snapshot stays valid once built
const SAMPLE_VALIDITY_HOURS: i64 = 6;

fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 23).expect("valid date")
}

fn window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 22).expect("valid date")
}

#[allow(clippy::too_many_arguments)]
fn route(
    origin: (&str, &str, &str),
    destination: (&str, &str, &str, &str),
    airline: (&str, &str),
    total: u64,
    cancelled: u64,
    delayed: u64,
    avg_delay: f64,
) -> RouteMetric {
    let completed = total - cancelled;
    let on_time = completed - delayed;
    let pct = |part: u64| {
        if total > 0 {
            part as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    };
    RouteMetric {
        origin_airport_code: origin.0.to_string(),
        origin_airport_name: origin.1.to_string(),
        origin_city: origin.2.to_string(),
        origin_country: "Argentina".to_string(),
        destination_airport_code: destination.0.to_string(),
        destination_airport_name: destination.1.to_string(),
        destination_city: destination.2.to_string(),
        destination_country: destination.3.to_string(),
        airline_code: airline.0.to_string(),
        airline_name: airline.1.to_string(),
        window_start_date: window_start(),
        window_end_date: window_end(),
        total_flights: total,
        total_completed_flights: completed,
        total_cancelled_flights: cancelled,
        total_delayed_flights: delayed,
        total_on_time_flights: on_time,
        avg_delay_minutes: avg_delay,
        on_time_percentage: pct(on_time),
        delayed_percentage: pct(delayed),
        cancellation_rate: pct(cancelled),
    }
}

/// Sample route metrics covering the main corridors out of AEP/EZE
pub fn sample_routes() -> Vec<RouteMetric> {
    const AEP: (&str, &str, &str) = ("AEP", "Aeroparque Jorge Newbery", "Buenos Aires");
    const EZE: (&str, &str, &str) = ("EZE", "Aeropuerto Internacional Ministro Pistarini", "Buenos Aires");
    const COR: (&str, &str, &str) = (
        "COR",
        "Aeropuerto Internacional Ingeniero Ambrosio Taravella",
        "Córdoba",
    );
    const MDZ: (&str, &str, &str) = ("MDZ", "Aeropuerto Internacional El Plumerillo", "Mendoza");

    const GRU: (&str, &str, &str, &str) = (
        "GRU",
        "Aeropuerto Internacional de Guarulhos",
        "São Paulo",
        "Brasil",
    );
    const GIG: (&str, &str, &str, &str) = (
        "GIG",
        "Aeropuerto Internacional do Galeão",
        "Rio de Janeiro",
        "Brasil",
    );
    const SCL: (&str, &str, &str, &str) = (
        "SCL",
        "Aeropuerto Internacional Arturo Merino Benítez",
        "Santiago",
        "Chile",
    );
    const MIA: (&str, &str, &str, &str) =
        ("MIA", "Miami International Airport", "Miami", "Estados Unidos");
    const MAD: (&str, &str, &str, &str) = (
        "MAD",
        "Aeropuerto Adolfo Suárez Madrid-Barajas",
        "Madrid",
        "España",
    );

    const AR: (&str, &str) = ("AR", "Aerolíneas Argentinas");
    const LA: (&str, &str) = ("LA", "LATAM Airlines");
    const JA: (&str, &str) = ("JA", "JetSMART");
    const AA: (&str, &str) = ("AA", "American Airlines");
    const IB: (&str, &str) = ("IB", "Iberia");

    vec![
        route(AEP, GRU, AR, 342, 14, 82, 23.0),
        route(AEP, GRU, LA, 298, 8, 58, 18.0),
        route(AEP, GIG, AR, 156, 8, 44, 28.0),
        route(AEP, SCL, AR, 412, 14, 72, 19.0),
        route(AEP, SCL, LA, 524, 8, 62, 12.0),
        route(AEP, SCL, JA, 186, 12, 52, 32.0),
        route(EZE, MIA, AR, 124, 6, 38, 34.0),
        route(EZE, MIA, AA, 186, 4, 28, 14.0),
        route(EZE, MAD, AR, 92, 4, 26, 42.0),
        route(EZE, MAD, IB, 124, 2, 18, 16.0),
        route(COR, GRU, AR, 62, 4, 14, 21.0),
        route(MDZ, SCL, LA, 186, 6, 22, 11.0),
    ]
}

fn sample_airlines() -> Vec<AirlineBreakdown> {
    let airline = |name: &str,
                   total: u64,
                   cancelled: u64,
                   avg_delay: f64,
                   buckets: [u64; 5]| AirlineBreakdown {
        airline_name: name.to_string(),
        total_flights: total,
        cancelled_flights: cancelled,
        avg_delay_minutes: avg_delay,
        hours_lost: (total as f64 * avg_delay / 60.0 * 10.0).round() / 10.0,
        delay_over_45: buckets[0],
        delay_45_30: buckets[1],
        delay_30_15: buckets[2],
        delay_15_0: buckets[3],
        on_time_or_early: buckets[4],
        dbt_updated_at: "2026-08-01T06:00:00Z".to_string(),
    };

    vec![
        airline("Aerolíneas Argentinas", 1188, 50, 24.1, [78, 84, 134, 230, 612]),
        airline("LATAM Airlines", 1008, 22, 13.9, [38, 44, 76, 168, 660]),
        airline("JetSMART", 186, 12, 32.0, [22, 28, 42, 60, 22]),
        airline("American Airlines", 186, 4, 14.0, [10, 10, 18, 36, 108]),
        airline("Iberia", 124, 2, 16.0, [8, 8, 14, 26, 66]),
    ]
}

fn sample_tops() -> Vec<TopRecord> {
    let destination = |rank: u32, city: &str, country: &str, flights: u64, delay: f64| TopRecord {
        record_type: TopRecordType::TopDestination,
        rank,
        destination_city: Some(city.to_string()),
        destination_country: Some(country.to_string()),
        total_flights: Some(flights),
        avg_delay_minutes: Some(delay),
        flight_number: None,
        origin_airport_code: None,
        destination_airport_code: None,
        delay_minutes: None,
        scheduled_departure_time: None,
        actual_departure_time: None,
    };
    let flight = |kind: TopRecordType,
                  rank: u32,
                  number: &str,
                  origin: &str,
                  dest: &str,
                  city: &str,
                  delay: f64| TopRecord {
        record_type: kind,
        rank,
        destination_city: Some(city.to_string()),
        destination_country: None,
        total_flights: None,
        avg_delay_minutes: None,
        flight_number: Some(number.to_string()),
        origin_airport_code: Some(origin.to_string()),
        destination_airport_code: Some(dest.to_string()),
        delay_minutes: Some(delay),
        scheduled_departure_time: Some("2026-01-18T14:35:00".to_string()),
        actual_departure_time: None,
    };

    vec![
        destination(1, "Santiago", "Chile", 1122, 17.4),
        destination(2, "São Paulo", "Brasil", 640, 20.7),
        destination(3, "Miami", "Estados Unidos", 310, 22.0),
        flight(TopRecordType::TopDelay, 1, "AR1134", "EZE", "MAD", "Madrid", 412.0),
        flight(TopRecordType::TopDelay, 2, "JA3044", "AEP", "SCL", "Santiago", 287.0),
        flight(TopRecordType::TopEarly, 1, "LA462", "AEP", "SCL", "Santiago", -22.0),
        flight(TopRecordType::TopEarly, 2, "AA996", "EZE", "MIA", "Miami", -18.0),
    ]
}

/// Bucket counts; the six buckets sum to the headline flight total
fn sample_buckets() -> Vec<BucketCount> {
    let bucket = |name: &str, flights: u64| BucketCount {
        bucket: name.to_string(),
        total_flights: flights,
    };
    vec![
        bucket("cancelled", 74),
        bucket("delay_over_45", 156),
        bucket("delay_45_30", 174),
        bucket("delay_30_15", 284),
        bucket("delay_15_0", 520),
        bucket("on_time_or_early", 1616),
    ]
}

fn sample_daily_status() -> Vec<DailyStatus> {
    let day = |d: u32, total: u64, cancelled: u64, over30: u64, delay: f64, city: &str| {
        DailyStatus {
            flight_date: NaiveDate::from_ymd_opt(2026, 1, 15 + d).expect("valid date"),
            total_flights: total,
            cancelled_flights: cancelled,
            delayed_over_30min: over30,
            avg_delay_minutes: delay,
            top_destination_city: Some(city.to_string()),
            top_destination_country: Some(if city == "Miami" {
                "Estados Unidos".to_string()
            } else {
                "Chile".to_string()
            }),
            dbt_updated_at: "2026-08-01T06:00:00Z".to_string(),
        }
    };
    vec![
        day(1, 402, 8, 44, 18.2, "Santiago"),
        day(2, 418, 12, 58, 22.6, "Santiago"),
        day(3, 396, 6, 38, 15.1, "Miami"),
        day(4, 442, 16, 72, 28.4, "Santiago"),
        day(5, 410, 10, 48, 19.8, "Santiago"),
        day(6, 388, 9, 36, 14.9, "Miami"),
        day(7, 368, 13, 34, 16.5, "Santiago"),
    ]
}

fn sample_gates() -> Vec<GateMetrics> {
    let gate = |name: &str, dist: [u64; 24], avg_delay: f64, max_delay: f64, on_time_share: f64| {
        let total: u64 = dist.iter().sum();
        let on_time = (total as f64 * on_time_share).round() as u64;
        GateMetrics {
            gate: name.to_string(),
            total_flights: total,
            avg_delay_minutes: avg_delay,
            delayed_flights: total - on_time,
            on_time_flights: on_time,
            on_time_percentage: on_time_share * 100.0,
            max_delay_minutes: max_delay,
            time_distribution: dist.to_vec(),
        }
    };

    vec![
        gate(
            "2",
            [0, 0, 0, 0, 0, 4, 18, 32, 26, 20, 14, 12, 16, 14, 10, 12, 18, 22, 20, 12, 8, 4, 2, 0],
            12.4,
            96.0,
            0.84,
        ),
        gate(
            "5",
            [0, 0, 0, 0, 2, 6, 22, 38, 30, 22, 16, 14, 12, 14, 12, 14, 20, 26, 22, 14, 6, 2, 0, 0],
            21.8,
            187.0,
            0.71,
        ),
        gate(
            "9",
            [0, 0, 0, 0, 0, 2, 10, 18, 16, 12, 10, 8, 10, 8, 8, 10, 12, 16, 12, 8, 4, 2, 0, 0],
            9.2,
            64.0,
            0.88,
        ),
        gate(
            "14",
            [0, 0, 0, 0, 0, 0, 6, 12, 10, 8, 6, 6, 8, 6, 6, 8, 10, 12, 10, 6, 2, 0, 0, 0],
            27.5,
            203.0,
            0.62,
        ),
    ]
}

/// Builds the complete sample snapshot, valid for a few hours from now
pub fn sample_dashboard() -> DashboardData {
    let generated_at = Utc::now();
    DashboardData {
        headline: HeadlineMetrics {
            total_flights: 2824,
            cancelled_flights: 74,
            delayed_over_30min: 330,
            delayed_over_45min: 156,
            avg_delay_minutes: 19.6,
            lookback_days: 60,
            dbt_updated_at: "2026-08-01T06:00:00Z".to_string(),
        },
        airlines: sample_airlines(),
        tops: sample_tops(),
        buckets: sample_buckets(),
        daily_status: sample_daily_status(),
        routes: sample_routes(),
        gates: sample_gates(),
        generated_at,
        expires_at: generated_at + Duration::hours(SAMPLE_VALIDITY_HOURS),
    }
}
