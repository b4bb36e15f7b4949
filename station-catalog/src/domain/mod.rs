//! Domain types for the station catalog.
//!
//! These types represent validated provider data. Required fields are plain
//! values and vocabularies are closed enums, so code that receives a
//! [`Catalog`] never has to re-check what the validator already enforced.

mod catalog;
mod codes;
mod schedule;
mod station;

pub use catalog::{Catalog, Country, Region, Settlement};
pub use codes::Codes;
pub use schedule::{RouteThread, Schedule, ScheduleDirection, SubtypeCode, TransportSubtype};
pub use station::{Station, StationCategory, TransportMode, UnknownToken};
