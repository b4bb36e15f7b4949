//! Suburban schedule at one station.

use serde::{Deserialize, Serialize};

use super::{TransportMode, UnknownToken};

/// Named suburban train product, as coded by the provider.
///
/// Unlike station vocabularies there is no "unspecified" value: every
/// thread must carry a subtype code from this table.
///
/// # Examples
///
/// ```
/// use station_catalog::domain::SubtypeCode;
///
/// assert_eq!(SubtypeCode::from_token("rex").unwrap(), SubtypeCode::Rex);
/// assert_eq!(SubtypeCode::from_token("lastdl").unwrap(), SubtypeCode::Last);
/// assert!(SubtypeCode::from_token("").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtypeCode {
    Rex,
    Sputnik,
    Skiarrow,
    Shezh,
    Skirus,
    City,
    Kalina,
    Vostok,
    Prostoryaltaya,
    Vag14,
    /// "Ласточка", coded as both `last` and `lastdl`.
    Last,
    Exprdal,
    Volzhex,
    Stdplus,
    Express,
    Skor,
    Fiztekh,
    Vag6,
    Suburban,
}

impl SubtypeCode {
    /// Decode a provider `transport_subtype.code` token.
    pub fn from_token(token: &str) -> Result<Self, UnknownToken> {
        let code = match token {
            "rex" => Self::Rex,
            "sputnik" => Self::Sputnik,
            "skiarrow" => Self::Skiarrow,
            "shezh" => Self::Shezh,
            "skirus" => Self::Skirus,
            "city" => Self::City,
            "kalina" => Self::Kalina,
            "vostok" => Self::Vostok,
            "prostoryaltaya" => Self::Prostoryaltaya,
            "14vag" => Self::Vag14,
            "last" | "lastdl" => Self::Last,
            "exprdal" => Self::Exprdal,
            "volzhex" => Self::Volzhex,
            "stdplus" => Self::Stdplus,
            "express" => Self::Express,
            "skor" => Self::Skor,
            "fiztekh" => Self::Fiztekh,
            "vag6" => Self::Vag6,
            "suburban" => Self::Suburban,
            other => return Err(UnknownToken::new("transport subtype", other)),
        };
        Ok(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSubtype {
    pub code: SubtypeCode,
    pub title: String,
    /// Hex colour, e.g. `#FF7F44`.
    pub color: String,
}

/// A train run calling at the station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteThread {
    pub uid: String,
    pub number: String,
    pub title: String,
    pub is_express: bool,
    pub transport_mode: TransportMode,
    pub subtype: TransportSubtype,
}

/// A direction the station's departures can be filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDirection {
    /// Machine name, e.g. `all`.
    pub code: String,
    pub title: String,
}

/// Validated schedule of one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub directions: Vec<ScheduleDirection>,
    pub threads: Vec<RouteThread>,
}

impl Schedule {
    /// Threads with an express fare.
    pub fn express_threads(&self) -> impl Iterator<Item = &RouteThread> {
        self.threads.iter().filter(|t| t.is_express)
    }
}
