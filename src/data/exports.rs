//! Export fetch orchestrator
//!
//! Fetches the JSON collections referenced by the manifest and merges them
//! into one dashboard snapshot. Collections are fetched concurrently; the
//! optional gates export degrades to an empty list and a missing headline
//! row degrades to zeros, while any other failure fails the whole load.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::manifest::{ManifestClient, ManifestError};
use super::{
    AirlineBreakdown, BucketCount, DailyStatus, DashboardData, GateMetrics, HeadlineMetrics,
    RouteMetric, TopRecord,
};

/// Errors that can occur when loading the dashboard collections
#[derive(Debug, Error)]
pub enum ExportError {
    /// Manifest fetch or URL resolution failed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Export request for {url} returned status {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to parse an export payload
    #[error("Failed to parse export {url}: {source}")]
    ParseError {
        url: String,
        source: serde_json::Error,
    },
}

/// Export payloads come either wrapped (`{metadata?, data: [...]}`) or as a
/// bare array, depending on which pipeline produced them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

/// Decode an export body, accepting both envelope shapes
fn decode_export<T: DeserializeOwned>(url: &str, text: &str) -> Result<Vec<T>, ExportError> {
    let envelope: ExportEnvelope<T> =
        serde_json::from_str(text).map_err(|source| ExportError::ParseError {
            url: url.to_string(),
            source,
        })?;
    Ok(match envelope {
        ExportEnvelope::Bare(rows) => rows,
        ExportEnvelope::Wrapped { data } => data,
    })
}

/// Client for fetching the full dashboard snapshot
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    manifest: ManifestClient,
}

impl DashboardClient {
    /// Create a new DashboardClient around a manifest client
    pub fn new(manifest: ManifestClient) -> Self {
        Self {
            client: Client::new(),
            manifest,
        }
    }

    /// Fetch a single export collection
    async fn fetch_export<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, ExportError> {
        let url = self.manifest.resolve_url(resource)?;
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ExportError::BadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }
        let text = response.text().await?;
        decode_export(url.as_str(), &text)
    }

    /// Fetch the optional gates export, degrading to empty on any failure
    async fn fetch_gates(&self, resource: Option<&str>) -> Vec<GateMetrics> {
        match resource {
            Some(url) => self.fetch_export(url).await.unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Fetch the manifest and every collection it references, concurrently
    ///
    /// # Returns
    /// * `Ok(DashboardData)` - The merged snapshot, stamped with the
    ///   manifest's validity window
    /// * `Err(ExportError)` - If the manifest or a required collection fails
    pub async fn fetch_dashboard(&self) -> Result<DashboardData, ExportError> {
        let manifest = self.manifest.fetch_manifest().await?;
        let urls = &manifest.urls;

        let (headline_rows, airlines, tops, buckets, daily_status, routes, gates) = futures::join!(
            self.fetch_export::<HeadlineMetrics>(&urls.headline),
            self.fetch_export::<AirlineBreakdown>(&urls.airline_breakdown),
            self.fetch_export::<TopRecord>(&urls.tops),
            self.fetch_export::<BucketCount>(&urls.bucket_distribution),
            self.fetch_export::<DailyStatus>(&urls.daily_status),
            self.fetch_export::<RouteMetric>(&urls.routes_metrics),
            self.fetch_gates(urls.gates_analysis.as_deref()),
        );

        let headline = headline_rows?.into_iter().next().unwrap_or_default();

        Ok(DashboardData {
            headline,
            airlines: airlines?,
            tops: tops?,
            buckets: buckets?,
            daily_status: daily_status?,
            routes: routes?,
            gates,
            generated_at: manifest.generated_at,
            expires_at: manifest.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_array() {
        let text = r#"[{"bucket": "cancelled", "total_flights": 14}]"#;
        let rows: Vec<BucketCount> = decode_export("test.json", text).expect("should decode");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket, "cancelled");
        assert_eq!(rows[0].total_flights, 14);
    }

    #[test]
    fn test_decode_wrapped_payload() {
        let text = r#"{
            "metadata": {"exported_at": "2026-08-01T12:00:00Z", "total_records": 2},
            "data": [
                {"bucket": "on_time_or_early", "total_flights": 820},
                {"bucket": "delay_15_0", "total_flights": 120}
            ]
        }"#;
        let rows: Vec<BucketCount> = decode_export("test.json", text).expect("should decode");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].bucket, "delay_15_0");
    }

    #[test]
    fn test_decode_wrapped_payload_without_data_is_empty() {
        let text = r#"{"metadata": {"source": "warehouse"}}"#;
        let rows: Vec<BucketCount> = decode_export("test.json", text).expect("should decode");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_decode_invalid_json_reports_url() {
        let result: Result<Vec<BucketCount>, _> = decode_export("bad.json", "not json");
        match result {
            Err(ExportError::ParseError { url, .. }) => assert_eq!(url, "bad.json"),
            other => panic!("expected ParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_empty_bare_array() {
        let rows: Vec<RouteMetric> = decode_export("routes.json", "[]").expect("should decode");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_gates_without_url_is_empty() {
        let client = DashboardClient::new(ManifestClient::with_url(
            "https://demoras-ar.github.io/data/manifest.json",
        ));
        let gates = client.fetch_gates(None).await;
        assert!(gates.is_empty());
    }
}
