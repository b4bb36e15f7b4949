//! Process configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::rasp::RaspConfig;
use crate::repository::RepositoryConfig;

/// Country whose catalog is kept, matched against the provider's title.
pub const DEFAULT_TARGET_COUNTRY: &str = "Россия";

/// Default location of the catalog cache file.
pub const DEFAULT_CACHE_PATH: &str = "cache/stations.json";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Everything the binary needs to build the pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rasp: RaspConfig,
    pub repository: RepositoryConfig,
    pub target_country: String,
    pub cache_path: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// | Variable                 | Default               |
    /// |--------------------------|-----------------------|
    /// | `RASP_API_KEY`           | required              |
    /// | `RASP_BASE_URL`          | provider production   |
    /// | `RASP_TIMEOUT_SECS`      | 30                    |
    /// | `CATALOG_CACHE_PATH`     | `cache/stations.json` |
    /// | `CATALOG_TARGET_COUNTRY` | `Россия`              |
    /// | `CATALOG_TTL_HOURS`      | 24                    |
    /// | `CATALOG_DEBUG_DIR`      | unset (no dumps)      |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Empty values count as unset
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("RASP_API_KEY").ok_or(ConfigError::Missing("RASP_API_KEY"))?;
        let mut rasp = RaspConfig::new(api_key);
        if let Some(url) = get("RASP_BASE_URL") {
            rasp = rasp.with_base_url(url);
        }
        if let Some(secs) = get("RASP_TIMEOUT_SECS") {
            rasp = rasp.with_timeout(parse_number("RASP_TIMEOUT_SECS", &secs)?);
        }
        if let Some(dir) = get("CATALOG_DEBUG_DIR") {
            rasp = rasp.with_debug_dump_dir(dir);
        }

        let mut repository = RepositoryConfig::new();
        if let Some(hours) = get("CATALOG_TTL_HOURS") {
            let hours = parse_number("CATALOG_TTL_HOURS", &hours)?;
            repository = repository.with_ttl(Duration::from_secs(hours.saturating_mul(60 * 60)));
        }

        Ok(Self {
            rasp,
            repository,
            target_country: get("CATALOG_TARGET_COUNTRY")
                .unwrap_or_else(|| DEFAULT_TARGET_COUNTRY.to_string()),
            cache_path: get("CATALOG_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH)),
        })
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            message: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::Invalid {
            var,
            message: format!("{value:?}: {e}"),
        }),
    }
}
