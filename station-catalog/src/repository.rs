//! Cache-or-fetch policy for the station catalog.
//!
//! ```text
//! load cache ──fresh──────────────────────────────▶ cached catalog
//!     │
//!     └─stale/missing─▶ fetch ──ok──▶ save ───────▶ new catalog
//!                         │
//!                         └─err─▶ any cache? ─yes─▶ stale catalog
//!                                       └──────no─▶ CatalogUnavailable
//! ```
//!
//! Freshness only decides whether to go to the network. Stale data is
//! always preferred over no data.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::domain::Catalog;
use crate::rasp::{FetchError, ValidationError};

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on how long a finished outcome is kept for waiters.
const IN_FLIGHT_TTL: Duration = Duration::from_secs(5);

/// Why a source produced no catalog.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid provider data: {0}")]
    Validation(#[from] ValidationError),
}

/// Somewhere a fresh catalog can come from.
///
/// This abstraction allows the repository to be tested without a network.
pub trait CatalogSource: Send + Sync {
    /// Fetch, validate and filter a new catalog.
    fn fetch_catalog(&self) -> impl Future<Output = Result<Catalog, SourceError>> + Send;
}

/// The only error that reaches callers of [`CatalogRepository::get_catalog`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    /// Fetch failed and there was no cache to fall back on
    #[error("station catalog unavailable for {}: {reason}", key.display())]
    CatalogUnavailable { key: PathBuf, reason: String },
}

/// Configuration for the catalog repository.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// How long a cached catalog is served without refetching.
    pub ttl: Duration,
}

impl RepositoryConfig {
    /// Create a new config with the default TTL (24 hours).
    pub fn new() -> Self {
        Self { ttl: DEFAULT_TTL }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of looking in the cache.
#[derive(Debug)]
enum CacheState<T> {
    Fresh(CacheEntry<T>),
    Stale(CacheEntry<T>),
    Missing,
}

impl<T> CacheState<T> {
    fn classify(entry: Option<CacheEntry<T>>, now: DateTime<Utc>, ttl: Duration) -> Self {
        match entry {
            Some(entry) if entry.is_fresh(now, ttl) => CacheState::Fresh(entry),
            Some(entry) => CacheState::Stale(entry),
            None => CacheState::Missing,
        }
    }
}

/// Serves the catalog from disk, refreshing it from a [`CatalogSource`].
///
/// Resolutions are coalesced per key: callers that arrive while one is in
/// progress wait for it and receive its outcome, whether that is a new
/// catalog, a stale fallback or [`RepositoryError::CatalogUnavailable`].
/// Overlapping requests therefore cost at most one network round trip.
pub struct CatalogRepository<S> {
    source: S,
    store: CacheStore,
    config: RepositoryConfig,
    /// Outcome of the current resolution per key, removed once handed out.
    in_flight: MokaCache<PathBuf, Result<Catalog, RepositoryError>>,
}

impl<S: CatalogSource> CatalogRepository<S> {
    pub fn new(source: S, config: RepositoryConfig) -> Self {
        Self {
            source,
            store: CacheStore::new(),
            config,
            in_flight: MokaCache::builder().time_to_live(IN_FLIGHT_TTL).build(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the current catalog for the cache file at `key`.
    pub async fn get_catalog(&self, key: impl AsRef<Path>) -> Result<Catalog, RepositoryError> {
        let key = normalize_key(key.as_ref());

        let outcome = self
            .in_flight
            .get_with(key.clone(), self.resolve(&key))
            .await;
        // Later callers start a new resolution against the updated file
        self.in_flight.invalidate(&key).await;

        outcome
    }

    async fn resolve(&self, key: &Path) -> Result<Catalog, RepositoryError> {
        let cached = self.store.load::<Catalog>(key).await;

        let fallback = match CacheState::classify(cached, Utc::now(), self.config.ttl) {
            CacheState::Fresh(entry) => {
                debug!(path = %key.display(), created = %entry.creation_time, "catalog cache is fresh");
                return Ok(entry.data);
            }
            CacheState::Stale(entry) => {
                debug!(path = %key.display(), created = %entry.creation_time, "catalog cache is stale, fetching");
                Some(entry)
            }
            CacheState::Missing => {
                debug!(path = %key.display(), "no catalog cache, fetching");
                None
            }
        };

        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                if let Err(e) = self.store.save(key, &catalog).await {
                    warn!(path = %key.display(), error = %e, "failed to save catalog cache");
                }
                Ok(catalog)
            }
            Err(err) => match fallback {
                Some(entry) => {
                    info!(
                        path = %key.display(),
                        error = %err,
                        age_hours = entry.age(Utc::now()).num_hours(),
                        "catalog fetch failed, serving stale cache"
                    );
                    Ok(entry.data)
                }
                None => {
                    warn!(path = %key.display(), error = %err, "catalog fetch failed with no cache");
                    Err(RepositoryError::CatalogUnavailable {
                        key: key.to_path_buf(),
                        reason: err.to_string(),
                    })
                }
            },
        }
    }
}

/// `a.json` and `./a.json` name the same file and must share a resolution.
fn normalize_key(key: &Path) -> PathBuf {
    key.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
