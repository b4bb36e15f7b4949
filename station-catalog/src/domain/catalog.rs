//! The catalog tree: country → region → settlement → station.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Codes, Station};

/// A town or village and the stations that serve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub title: String,
    pub codes: Codes,
    pub stations: Vec<Station>,
}

/// An administrative region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub title: String,
    pub codes: Codes,
    pub settlements: Vec<Settlement>,
}

/// A country and its regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub title: String,
    pub codes: Codes,
    pub regions: Vec<Region>,
}

impl Country {
    /// Number of settlements across all regions.
    pub fn settlement_count(&self) -> usize {
        self.regions.iter().map(|r| r.settlements.len()).sum()
    }

    /// Number of stations across all settlements.
    pub fn station_count(&self) -> usize {
        self.regions
            .iter()
            .flat_map(|r| &r.settlements)
            .map(|s| s.stations.len())
            .sum()
    }

    /// Iterate over every station in tree order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.regions
            .iter()
            .flat_map(|r| &r.settlements)
            .flat_map(|s| &s.stations)
    }
}

/// The station catalog for one country.
///
/// `creation_time` is fixed when the catalog is built and is the only input
/// to staleness decisions. There is no way to change it after construction;
/// [`Catalog::map_country`] carries it over unchanged. On disk the creation
/// time is kept by the cache entry, next to the serialised [`Country`].
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    country: Country,
    creation_time: DateTime<Utc>,
}

impl Catalog {
    pub fn new(country: Country, creation_time: DateTime<Utc>) -> Self {
        Self {
            country,
            creation_time,
        }
    }

    pub fn country(&self) -> &Country {
        &self.country
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    /// Transform the country tree, keeping the creation time.
    pub fn map_country(self, f: impl FnOnce(Country) -> Country) -> Self {
        Self {
            country: f(self.country),
            creation_time: self.creation_time,
        }
    }
}
