//! Disk-based cache of timestamped snapshots.
//!
//! One JSON file per key, holding `{ "creationTime": ..., "data": ... }`.
//! A missing or unreadable file is "no cache", never an error. Writes go to
//! a temporary file next to the target and are renamed into place, so a
//! reader never sees a half-written snapshot.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::{Catalog, Country};

/// A value stored as a snapshot plus the time it was created.
///
/// The creation time lives only in the entry, never inside the snapshot,
/// so a file cannot disagree with itself about its age.
pub trait Cacheable: Sized {
    /// The part of the value that is written to disk.
    type Snapshot: Serialize + DeserializeOwned;

    fn creation_time(&self) -> DateTime<Utc>;

    fn snapshot(&self) -> &Self::Snapshot;

    /// Rebuild the value from a loaded entry.
    fn restore(creation_time: DateTime<Utc>, snapshot: Self::Snapshot) -> Self;
}

impl Cacheable for Catalog {
    type Snapshot = Country;

    fn creation_time(&self) -> DateTime<Utc> {
        Catalog::creation_time(self)
    }

    fn snapshot(&self) -> &Country {
        self.country()
    }

    fn restore(creation_time: DateTime<Utc>, country: Country) -> Self {
        Catalog::new(country, creation_time)
    }
}

/// A cached value with the time it was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub creation_time: DateTime<Utc>,
    pub data: T,
}

impl<T> CacheEntry<T> {
    /// How old the entry is at `now`. Negative if it comes from the future.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.creation_time
    }

    /// Whether the entry is younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        self.age(now) < ttl
    }
}

/// Borrowed form of [`CacheEntry`] so saving doesn't clone the tree.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntryRef<'a, T> {
    creation_time: DateTime<Utc>,
    data: &'a T,
}

/// Errors from writing the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CacheError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-per-key snapshot store.
#[derive(Debug, Default)]
pub struct CacheStore {
    tmp_counter: AtomicU64,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the entry stored under `key`.
    ///
    /// Returns `None` if the file doesn't exist or doesn't decode.
    pub async fn load<T: Cacheable>(&self, key: &Path) -> Option<CacheEntry<T>> {
        let contents = match tokio::fs::read(key).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %key.display(), "no cache file");
                return None;
            }
            Err(e) => {
                warn!(path = %key.display(), error = %e, "failed to read cache file, ignoring it");
                return None;
            }
        };

        match serde_json::from_slice::<CacheEntry<T::Snapshot>>(&contents) {
            Ok(entry) => {
                debug!(path = %key.display(), created = %entry.creation_time, "loaded cache entry");
                Some(CacheEntry {
                    creation_time: entry.creation_time,
                    data: T::restore(entry.creation_time, entry.data),
                })
            }
            Err(e) => {
                warn!(path = %key.display(), error = %e, "cache file is corrupt, ignoring it");
                None
            }
        }
    }

    /// Replace the file under `key` with a snapshot of `value`.
    ///
    /// Creates parent directories if they don't exist.
    pub async fn save<T: Cacheable>(&self, key: &Path, value: &T) -> Result<(), CacheError> {
        let entry = CacheEntryRef {
            creation_time: value.creation_time(),
            data: value.snapshot(),
        };
        let json = serde_json::to_vec_pretty(&entry)?;

        if let Some(parent) = key.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(CacheError::io(parent))?;
        }

        let tmp = self.tmp_path(key);
        if let Err(e) = write_synced(&tmp, &json).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::io(&tmp)(e));
        }

        if let Err(e) = tokio::fs::rename(&tmp, key).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CacheError::io(key)(e));
        }

        debug!(path = %key.display(), bytes = json.len(), "saved cache entry");
        Ok(())
    }

    /// Unique sibling path for an in-progress write.
    fn tmp_path(&self, key: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = key
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("cache");
        key.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Codes, Country, Region, Settlement, Station, StationCategory, TransportMode,
    };
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn catalog(created: DateTime<Utc>) -> Catalog {
        let station = Station {
            title: "Курский вокзал".to_string(),
            short_title: Some("Курский".to_string()),
            popular_title: None,
            codes: Codes::new("s9600213", Some("191602".to_string())),
            direction: Some("Курское".to_string()),
            station_category: StationCategory::TrainStation,
            transport_mode: TransportMode::Train,
            latitude: Some(55.756668),
            longitude: Some(37.661113),
        };
        Catalog::new(
            Country {
                title: "Россия".to_string(),
                codes: Codes::new("l225", None),
                regions: vec![Region {
                    title: "Москва и Московская область".to_string(),
                    codes: Codes::new("r1", None),
                    settlements: vec![Settlement {
                        title: "Москва".to_string(),
                        codes: Codes::new("c213", None),
                        stations: vec![station],
                    }],
                }],
            },
            created,
        )
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("stations.json");
        let store = CacheStore::new();
        let created = Utc::now();
        let original = catalog(created);

        store.save(&key, &original).await.unwrap();

        let entry: CacheEntry<Catalog> = store.load(&key).await.unwrap();
        assert_eq!(entry.creation_time, created);
        assert_eq!(entry.data, original);
        assert_eq!(entry.data.creation_time(), created);
    }

    #[tokio::test]
    async fn file_layout_is_readable_json() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("stations.json");
        let created = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();

        CacheStore::new().save(&key, &catalog(created)).await.unwrap();

        let text = std::fs::read_to_string(&key).unwrap();
        // Pretty-printed, non-ASCII left unescaped
        assert!(text.contains('\n'));
        assert!(text.contains("Курский вокзал"));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["creationTime"], "2024-03-15T10:00:00Z");
        assert_eq!(json["data"]["title"], "Россия");
        assert_eq!(
            json["data"]["regions"][0]["settlements"][0]["stations"][0]["transportMode"],
            "Train"
        );
    }

    #[tokio::test]
    async fn creation_time_is_stored_once() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("stations.json");
        let created = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();

        CacheStore::new().save(&key, &catalog(created)).await.unwrap();

        let text = std::fs::read_to_string(&key).unwrap();
        assert_eq!(text.matches("creationTime").count(), 1);

        // The loaded catalog takes its timestamp from the entry
        let moved = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut json: serde_json::Value = serde_json::from_str(&text).unwrap();
        json["creationTime"] = serde_json::json!(moved);
        std::fs::write(&key, json.to_string()).unwrap();

        let entry: CacheEntry<Catalog> = CacheStore::new().load(&key).await.unwrap();
        assert_eq!(entry.creation_time, moved);
        assert_eq!(entry.data.creation_time(), moved);
    }

    #[tokio::test]
    async fn missing_cache_returns_none() {
        let store = CacheStore::new();
        let loaded: Option<CacheEntry<Catalog>> = store
            .load(Path::new("/nonexistent/path/stations.json"))
            .await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("stations.json");
        let store = CacheStore::new();

        std::fs::write(&key, "{ not json").unwrap();
        assert!(store.load::<Catalog>(&key).await.is_none());

        std::fs::write(&key, r#"{"creationTime": "2024-03-15T10:00:00Z", "data": 42}"#).unwrap();
        assert!(store.load::<Catalog>(&key).await.is_none());

        std::fs::write(&key, r#"{"data": {}}"#).unwrap();
        assert!(store.load::<Catalog>(&key).await.is_none());
    }

    #[tokio::test]
    async fn save_overwrites_whole_file() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("stations.json");
        let store = CacheStore::new();

        // Longer content first, so leftovers would break parsing
        std::fs::write(&key, "x".repeat(1 << 16)).unwrap();

        let newer = catalog(Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap());
        store.save(&key, &newer).await.unwrap();

        let entry: CacheEntry<Catalog> = store.load(&key).await.unwrap();
        assert_eq!(entry.data, newer);

        // No temp files left behind
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("stations.json")]);
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("nested").join("dir").join("stations.json");

        CacheStore::new().save(&key, &catalog(Utc::now())).await.unwrap();
        assert!(key.exists());
    }

    #[tokio::test]
    async fn save_into_unwritable_location_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let err = CacheStore::new()
            .save(&blocker.join("stations.json"), &catalog(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn freshness_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let ttl = Duration::from_secs(24 * 60 * 60);
        let entry = |age: TimeDelta| CacheEntry {
            creation_time: now - age,
            data: (),
        };

        assert!(entry(TimeDelta::hours(23) + TimeDelta::minutes(59)).is_fresh(now, ttl));
        assert!(!entry(TimeDelta::hours(24)).is_fresh(now, ttl));
        assert!(!entry(TimeDelta::hours(24) + TimeDelta::seconds(1)).is_fresh(now, ttl));
        assert!(entry(TimeDelta::seconds(-30)).is_fresh(now, ttl));
        assert_eq!(entry(TimeDelta::hours(2)).age(now), TimeDelta::hours(2));
    }
}
