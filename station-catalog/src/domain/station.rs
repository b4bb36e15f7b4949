//! Station record and its closed vocabularies.

use serde::{Deserialize, Serialize};

use super::Codes;

/// Error returned when a provider token is not part of a known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} token: {token:?}")]
pub struct UnknownToken {
    vocabulary: &'static str,
    token: String,
}

impl UnknownToken {
    pub(super) fn new(vocabulary: &'static str, token: &str) -> Self {
        Self {
            vocabulary,
            token: token.to_string(),
        }
    }

    /// The token that was not recognised.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Kind of stopping point, as classified by the provider.
///
/// Decoding is strict: an absent or empty token is [`StationCategory::Unspecified`],
/// any other token outside the table is an error.
///
/// # Examples
///
/// ```
/// use station_catalog::domain::StationCategory;
///
/// assert_eq!(StationCategory::from_token(Some("platform")).unwrap(), StationCategory::Platform);
/// assert_eq!(StationCategory::from_token(None).unwrap(), StationCategory::Unspecified);
/// assert!(StationCategory::from_token(Some("spaceport")).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationCategory {
    Station,
    Platform,
    Stop,
    Checkpoint,
    Post,
    Crossing,
    OvertakingPoint,
    TrainStation,
    Airport,
    BusStation,
    BusStop,
    Unknown,
    Port,
    PortPoint,
    Wharf,
    RiverPort,
    MarineStation,
    Unspecified,
}

impl StationCategory {
    /// Decode a provider `station_type` token.
    pub fn from_token(token: Option<&str>) -> Result<Self, UnknownToken> {
        let category = match token {
            None | Some("") => Self::Unspecified,
            Some("station") => Self::Station,
            Some("platform") => Self::Platform,
            Some("stop") => Self::Stop,
            Some("checkpoint") => Self::Checkpoint,
            Some("post") => Self::Post,
            Some("crossing") => Self::Crossing,
            Some("overtaking_point") => Self::OvertakingPoint,
            Some("train_station") => Self::TrainStation,
            Some("airport") => Self::Airport,
            Some("bus_station") => Self::BusStation,
            Some("bus_stop") => Self::BusStop,
            Some("unknown") => Self::Unknown,
            Some("port") => Self::Port,
            Some("port_point") => Self::PortPoint,
            Some("wharf") => Self::Wharf,
            Some("river_port") => Self::RiverPort,
            Some("marine_station") => Self::MarineStation,
            Some(other) => return Err(UnknownToken::new("station type", other)),
        };
        Ok(category)
    }
}

/// Transport mode served at a station.
///
/// Same decoding rules as [`StationCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Plane,
    Train,
    Suburban,
    Bus,
    Water,
    Helicopter,
    Sea,
    Unspecified,
}

impl TransportMode {
    /// Decode a provider `transport_type` token.
    pub fn from_token(token: Option<&str>) -> Result<Self, UnknownToken> {
        let mode = match token {
            None | Some("") => Self::Unspecified,
            Some("plane") => Self::Plane,
            Some("train") => Self::Train,
            Some("suburban") => Self::Suburban,
            Some("bus") => Self::Bus,
            Some("water") => Self::Water,
            Some("helicopter") => Self::Helicopter,
            Some("sea") => Self::Sea,
            Some(other) => return Err(UnknownToken::new("transport type", other)),
        };
        Ok(mode)
    }

    /// Whether this is one of the rail modes the catalog keeps.
    pub fn is_rail(self) -> bool {
        matches!(self, Self::Train | Self::Suburban)
    }
}

/// A validated station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub title: String,
    pub short_title: Option<String>,
    pub popular_title: Option<String>,
    pub codes: Codes,
    /// Railway direction the station belongs to (e.g. "Курское").
    pub direction: Option<String>,
    pub station_category: StationCategory,
    pub transport_mode: TransportMode,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
