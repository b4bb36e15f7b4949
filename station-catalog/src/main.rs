use std::process::ExitCode;

use station_catalog::config::AppConfig;
use station_catalog::rasp::{RaspCatalogSource, RaspClient};
use station_catalog::repository::CatalogRepository;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match RaspClient::new(config.rasp) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create Rasp client");
            return ExitCode::FAILURE;
        }
    };

    let source = RaspCatalogSource::new(client, config.target_country);
    let repository = CatalogRepository::new(source, config.repository);

    match repository.get_catalog(&config.cache_path).await {
        Ok(catalog) => {
            let country = catalog.country();
            info!(
                country = %country.title,
                regions = country.regions.len(),
                settlements = country.settlement_count(),
                stations = country.station_count(),
                created = %catalog.creation_time(),
                cache = %config.cache_path.display(),
                "station catalog ready"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "station catalog unavailable");
            ExitCode::FAILURE
        }
    }
}
