//! Rasp HTTP client.
//!
//! One method, [`RaspClient::fetch`], runs a single GET against an
//! [`Endpoint`] and decodes the body into the endpoint's response DTO.
//! There is no retry loop here; retrying is the caller's call.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::FetchError;
use super::types::{StationScheduleResponse, StationsListResponse};

/// Default base URL for the Rasp API.
const DEFAULT_BASE_URL: &str = "https://api.rasp.yandex.net/v3.0";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A provider resource that can be fetched with a GET.
pub trait Endpoint {
    /// DTO the response body decodes into.
    type Response: DeserializeOwned;

    /// Path below the base URL, without slashes (e.g. `stations_list`).
    fn path(&self) -> &'static str;

    /// Endpoint-specific query parameters. The API key is added by the client.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// The full country → station catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationsListEndpoint;

impl Endpoint for StationsListEndpoint {
    type Response = StationsListResponse;

    fn path(&self) -> &'static str {
        "stations_list"
    }
}

/// All threads calling at one station.
#[derive(Debug, Clone)]
pub struct StationScheduleEndpoint {
    pub station: String,
    pub transport_types: String,
    pub result_timezone: String,
    pub limit: u32,
}

impl StationScheduleEndpoint {
    /// Suburban trains at `station`, times in Moscow time, one page of up to 999.
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            transport_types: "suburban".to_string(),
            result_timezone: "Europe/Moscow".to_string(),
            limit: 999,
        }
    }
}

impl Endpoint for StationScheduleEndpoint {
    type Response = StationScheduleResponse;

    fn path(&self) -> &'static str {
        "schedule"
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("station", self.station.clone()),
            ("transport_types", self.transport_types.clone()),
            ("result_timezone", self.result_timezone.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Configuration for the Rasp client.
#[derive(Debug, Clone)]
pub struct RaspConfig {
    /// API key, sent as the `apikey` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// When set, raw response bodies are written here as `<endpoint>.json`
    pub debug_dump_dir: Option<PathBuf>,
}

impl RaspConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug_dump_dir: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Dump raw responses into `dir`.
    pub fn with_debug_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dump_dir = Some(dir.into());
        self
    }
}

/// Client for the Rasp API.
#[derive(Debug, Clone)]
pub struct RaspClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    debug_dump_dir: Option<PathBuf>,
}

impl RaspClient {
    /// Create a new Rasp client.
    pub fn new(config: RaspConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            debug_dump_dir: config.debug_dump_dir,
        })
    }

    /// URL for an endpoint, without query parameters.
    pub fn url_for<E: Endpoint>(&self, endpoint: &E) -> String {
        format!("{}/{}/", self.base_url, endpoint.path())
    }

    /// Run one GET against `endpoint` and decode the body.
    pub async fn fetch<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, FetchError> {
        let url = self.url_for(endpoint);
        debug!(%url, "fetching");

        let response = self
            .http
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(&endpoint.query())
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Network {
                status: Some(status.as_u16()),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        if let Some(dir) = &self.debug_dump_dir {
            dump_body(dir, endpoint.path(), &body).await;
        }

        serde_json::from_str(&body).map_err(|e| {
            FetchError::Unexpected(format!("failed to decode {} response: {e}", endpoint.path()))
        })
    }

    /// Fetch the full station catalog.
    pub async fn fetch_stations(&self) -> Result<StationsListResponse, FetchError> {
        self.fetch(&StationsListEndpoint).await
    }

    /// Fetch the suburban schedule for one station.
    pub async fn fetch_schedule(
        &self,
        station_code: &str,
    ) -> Result<StationScheduleResponse, FetchError> {
        self.fetch(&StationScheduleEndpoint::new(station_code)).await
    }
}

/// Best-effort write of a raw response; failures are only logged.
async fn dump_body(dir: &std::path::Path, name: &str, body: &str) {
    let path = dir.join(format!("{name}.json"));
    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, body).await
    }
    .await;

    match result {
        Ok(()) => debug!(path = %path.display(), bytes = body.len(), "dumped raw response"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to dump raw response"),
    }
}
