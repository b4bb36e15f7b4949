//! Pruning the catalog down to rail stations.
//!
//! Bottom-up: stations that aren't train or suburban go first, then any
//! settlement left without stations, then any region left without
//! settlements. Surviving nodes keep their relative order.

use crate::domain::{Catalog, Country, Region, Settlement};

/// Keep only train and suburban stations, dropping branches left empty.
pub fn filter_catalog(catalog: Catalog) -> Catalog {
    catalog.map_country(filter_country)
}

fn filter_country(country: Country) -> Country {
    Country {
        regions: country
            .regions
            .into_iter()
            .filter_map(filter_region)
            .collect(),
        ..country
    }
}

fn filter_region(region: Region) -> Option<Region> {
    let settlements: Vec<Settlement> = region
        .settlements
        .into_iter()
        .filter_map(filter_settlement)
        .collect();

    (!settlements.is_empty()).then(|| Region {
        settlements,
        ..region
    })
}

fn filter_settlement(mut settlement: Settlement) -> Option<Settlement> {
    settlement
        .stations
        .retain(|station| station.transport_mode.is_rail());

    (!settlement.stations.is_empty()).then_some(settlement)
}
