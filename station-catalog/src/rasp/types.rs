//! Rasp API response DTOs.
//!
//! These types map directly to the provider's JSON responses. Every field is
//! an `Option` because the provider omits or nulls fields freely; deciding
//! which of them are actually required is the job of [`super::convert`].

use serde::{Deserialize, Deserializer};

/// Response from `stations_list`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsListResponse {
    pub countries: Option<Vec<CountryDto>>,
}

/// Identifier pair as sent by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CodesDto {
    /// The provider's own code (e.g. "s9600213"). Required after validation.
    pub yandex_code: Option<String>,
    /// Railway ESR code, present for rail stations only.
    pub esr_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryDto {
    pub title: Option<String>,
    pub codes: Option<CodesDto>,
    pub regions: Option<Vec<RegionDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionDto {
    pub title: Option<String>,
    pub codes: Option<CodesDto>,
    pub settlements: Option<Vec<SettlementDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementDto {
    pub title: Option<String>,
    pub codes: Option<CodesDto>,
    pub stations: Option<Vec<StationDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub popular_title: Option<String>,
    pub codes: Option<CodesDto>,
    /// Bare provider code, sent by some responses instead of `codes`.
    pub code: Option<String>,
    pub direction: Option<String>,
    pub station_type: Option<String>,
    pub transport_type: Option<String>,

    /// The provider sends an empty string for unknown coordinates.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

/// Accept any JSON value; only a JSON number yields a coordinate.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Response from `schedule` (all trains calling at one station).
#[derive(Debug, Clone, Deserialize)]
pub struct StationScheduleResponse {
    /// Requested date, `None` when the schedule is for all days.
    pub date: Option<String>,
    pub station: Option<ScheduleStationDto>,
    pub pagination: Option<PaginationDto>,
    pub schedule: Option<Vec<ScheduleItemDto>>,
    pub directions: Option<Vec<ScheduleDirectionDto>>,
    pub schedule_direction: Option<ScheduleDirectionDto>,
}

/// Station header of a schedule response.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleStationDto {
    pub code: Option<String>,
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub popular_title: Option<String>,
    pub station_type: Option<String>,
    pub transport_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationDto {
    pub total: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// One departure/arrival of a thread at the station.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleItemDto {
    pub thread: Option<RouteThreadDto>,
    pub is_fuzzy: Option<bool>,
    pub platform: Option<String>,
    /// Airport terminal; unused for rail.
    pub terminal: Option<String>,
    /// Human-readable running days, e.g. "ежедневно".
    pub days: Option<String>,
    pub except_days: Option<String>,
    pub stops: Option<String>,
    pub direction: Option<String>,
    pub arrival: Option<String>,
    pub departure: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteThreadDto {
    pub number: Option<String>,
    pub uid: Option<String>,
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub express_type: Option<String>,
    pub transport_type: Option<String>,
    pub transport_subtype: Option<TransportSubtypeDto>,
    pub vehicle: Option<String>,
    pub carrier: Option<CarrierDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportSubtypeDto {
    pub title: Option<String>,
    pub code: Option<String>,
    /// Hex colour, e.g. "#FF7F44".
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarrierDto {
    pub code: Option<i64>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDirectionDto {
    pub code: Option<String>,
    pub title: Option<String>,
}
