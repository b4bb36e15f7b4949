//! Yandex Rasp (schedule provider) client.
//!
//! This module fetches raw provider responses, converts them into the
//! validated domain tree, and exposes the result as a
//! [`CatalogSource`](crate::repository::CatalogSource).
//!
//! Key characteristics of the provider:
//! - Authentication is an `apikey` query parameter, not a header
//! - `stations_list` returns every country in one large document
//! - Fields are omitted or sent as empty strings rather than null, and
//!   coordinates are sometimes `""` instead of a number

mod client;
mod convert;
mod error;
mod source;
mod types;

pub use client::{
    Endpoint, RaspClient, RaspConfig, StationScheduleEndpoint, StationsListEndpoint,
};
pub use convert::{ValidationError, convert_catalog, convert_schedule};
pub use error::FetchError;
pub use source::RaspCatalogSource;
pub use types::{
    CarrierDto, CodesDto, CountryDto, PaginationDto, RegionDto, RouteThreadDto,
    ScheduleDirectionDto, ScheduleItemDto, ScheduleStationDto, SettlementDto, StationDto,
    StationScheduleResponse, StationsListResponse, TransportSubtypeDto,
};
