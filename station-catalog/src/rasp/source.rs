//! Catalog source backed by the live Rasp API.

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{Catalog, Schedule};
use crate::filter::filter_catalog;
use crate::repository::{CatalogSource, SourceError};

use super::client::RaspClient;
use super::convert::{convert_catalog, convert_schedule};

/// Fetches `stations_list`, validates it and prunes it to rail stations.
///
/// Also validates per-station schedules on request.
#[derive(Debug, Clone)]
pub struct RaspCatalogSource {
    client: RaspClient,
    target_country: String,
}

impl RaspCatalogSource {
    /// `target_country` must match the provider's country title exactly.
    pub fn new(client: RaspClient, target_country: impl Into<String>) -> Self {
        Self {
            client,
            target_country: target_country.into(),
        }
    }

    /// Fetch and validate the suburban schedule of one station.
    pub async fn fetch_schedule(&self, station_code: &str) -> Result<Schedule, SourceError> {
        let raw = self.client.fetch_schedule(station_code).await?;
        let schedule = convert_schedule(raw)?;

        debug!(
            station = station_code,
            threads = schedule.threads.len(),
            directions = schedule.directions.len(),
            "fetched station schedule"
        );

        Ok(schedule)
    }
}

impl CatalogSource for RaspCatalogSource {
    async fn fetch_catalog(&self) -> Result<Catalog, SourceError> {
        let raw = self.client.fetch_stations().await?;
        let catalog = filter_catalog(convert_catalog(raw, &self.target_country, Utc::now())?);

        let country = catalog.country();
        info!(
            country = %country.title,
            regions = country.regions.len(),
            settlements = country.settlement_count(),
            stations = country.station_count(),
            "fetched station catalog"
        );

        Ok(catalog)
    }
}
