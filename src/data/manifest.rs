//! Manifest client for the punctuality export feed
//!
//! The manifest is a small JSON document pointing at the export collections
//! (signed object-storage URLs or static-site paths) together with the
//! validity window that governs caching.

use reqwest::{Client, Url};
use thiserror::Error;

use super::Manifest;

/// Default manifest location for the published dashboard exports
pub const DEFAULT_MANIFEST_URL: &str = "https://demoras-ar.github.io/data/manifest.json";

/// Errors that can occur when fetching or resolving the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Manifest request returned status {0}")]
    BadStatus(reqwest::StatusCode),

    /// Failed to parse the manifest JSON
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The configured manifest URL is not a valid URL
    #[error("Invalid manifest URL '{0}'")]
    InvalidUrl(String),
}

/// Client for fetching the export manifest
#[derive(Debug, Clone)]
pub struct ManifestClient {
    client: Client,
    manifest_url: String,
}

impl Default for ManifestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestClient {
    /// Create a new ManifestClient pointing at the default feed
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
        }
    }

    /// Create a new ManifestClient with a custom manifest URL
    pub fn with_url(manifest_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            manifest_url: manifest_url.into(),
        }
    }

    /// The configured manifest URL
    #[allow(dead_code)]
    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    /// Fetch and parse the manifest
    ///
    /// # Returns
    /// * `Ok(Manifest)` - The parsed manifest
    /// * `Err(ManifestError)` - If the request, status, or parsing fails
    pub async fn fetch_manifest(&self) -> Result<Manifest, ManifestError> {
        let response = self.client.get(&self.manifest_url).send().await?;
        if !response.status().is_success() {
            return Err(ManifestError::BadStatus(response.status()));
        }
        let text = response.text().await?;
        let manifest = parse_manifest(&text)?;
        Ok(manifest)
    }

    /// Resolve a possibly-relative export URL against the manifest location
    ///
    /// Static-site manifests reference exports as `./data/<name>.json`;
    /// signed manifests carry absolute URLs, which pass through untouched.
    pub fn resolve_url(&self, resource: &str) -> Result<Url, ManifestError> {
        if let Ok(absolute) = Url::parse(resource) {
            return Ok(absolute);
        }
        let base = Url::parse(&self.manifest_url)
            .map_err(|_| ManifestError::InvalidUrl(self.manifest_url.clone()))?;
        base.join(resource)
            .map_err(|_| ManifestError::InvalidUrl(resource.to_string()))
    }
}

/// Parse manifest JSON into a Manifest
fn parse_manifest(text: &str) -> Result<Manifest, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_at(url: &str) -> ManifestClient {
        ManifestClient::with_url(url)
    }

    #[test]
    fn test_resolve_absolute_url_passes_through() {
        let client = client_at("https://demoras-ar.github.io/data/manifest.json");
        let url = client
            .resolve_url("https://storage.googleapis.com/exports/headline.json?sig=abc")
            .expect("absolute URL should resolve");
        assert_eq!(url.host_str(), Some("storage.googleapis.com"));
        assert_eq!(url.query(), Some("sig=abc"));
    }

    #[test]
    fn test_resolve_relative_url_joins_manifest_base() {
        let client = client_at("https://demoras-ar.github.io/data/manifest.json");
        let url = client
            .resolve_url("./headline.json")
            .expect("relative URL should resolve");
        assert_eq!(
            url.as_str(),
            "https://demoras-ar.github.io/data/headline.json"
        );
    }

    #[test]
    fn test_resolve_site_relative_url() {
        let client = client_at("https://demoras-ar.github.io/data/manifest.json");
        let url = client
            .resolve_url("/exports/tops.json")
            .expect("site-relative URL should resolve");
        assert_eq!(url.as_str(), "https://demoras-ar.github.io/exports/tops.json");
    }

    #[test]
    fn test_resolve_with_invalid_base_errors() {
        let client = client_at("not a url");
        let result = client.resolve_url("./headline.json");
        assert!(matches!(result, Err(ManifestError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_manifest_rejects_missing_urls() {
        let json = r#"{"generated_at": "2026-08-01T12:00:00Z", "expires_at": "2026-08-08T12:00:00Z"}"#;
        assert!(parse_manifest(json).is_err());
    }

    #[test]
    fn test_default_client_points_at_feed() {
        let client = ManifestClient::new();
        assert_eq!(client.manifest_url(), DEFAULT_MANIFEST_URL);
    }
}
