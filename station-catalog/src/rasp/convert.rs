//! Conversion from Rasp DTOs to domain types.
//!
//! Conversion is all-or-nothing: the first missing required field or
//! unrecognised vocabulary token anywhere in the tree aborts the whole
//! catalog. Unknown tokens are errors rather than skipped, so new provider
//! vocabulary shows up immediately instead of silently disappearing.

use chrono::{DateTime, Utc};

use crate::domain::{
    Catalog, Codes, Country, Region, RouteThread, Schedule, ScheduleDirection, Settlement,
    Station, StationCategory, SubtypeCode, TransportMode, TransportSubtype, UnknownToken,
};

use super::types::{
    CodesDto, CountryDto, RegionDto, RouteThreadDto, ScheduleDirectionDto, ScheduleItemDto,
    SettlementDto, StationDto, StationScheduleResponse, StationsListResponse,
    TransportSubtypeDto,
};

/// Error during DTO to domain conversion.
///
/// `path` locates the offending node, e.g. `regions[3].settlements[0].stations[12]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The configured country is not in the response
    #[error("country {0:?} not found in provider response")]
    CountryNotFound(String),

    /// Missing required field
    #[error("missing required field {field} at {}", display_path(path))]
    MissingField { path: String, field: &'static str },

    /// Token outside a closed vocabulary
    #[error("unknown {field} token {token:?} at {}", display_path(path))]
    UnknownToken {
        path: String,
        field: &'static str,
        token: String,
    },
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

impl ValidationError {
    fn missing(field: &'static str) -> Self {
        ValidationError::MissingField {
            path: String::new(),
            field,
        }
    }

    fn unknown(field: &'static str, err: UnknownToken) -> Self {
        ValidationError::UnknownToken {
            path: String::new(),
            field,
            token: err.token().to_string(),
        }
    }

    /// Prefix the error location with the parent node.
    fn within(self, segment: &str, index: usize) -> Self {
        let prefix = |path: String| {
            if path.is_empty() {
                format!("{segment}[{index}]")
            } else {
                format!("{segment}[{index}].{path}")
            }
        };
        match self {
            ValidationError::MissingField { path, field } => ValidationError::MissingField {
                path: prefix(path),
                field,
            },
            ValidationError::UnknownToken { path, field, token } => {
                ValidationError::UnknownToken {
                    path: prefix(path),
                    field,
                    token,
                }
            }
            other => other,
        }
    }
}

/// Convert a `stations_list` response into the catalog for `target_country`.
///
/// Only the country whose title equals `target_country` exactly is
/// validated; the others are discarded untouched.
pub fn convert_catalog(
    response: StationsListResponse,
    target_country: &str,
    creation_time: DateTime<Utc>,
) -> Result<Catalog, ValidationError> {
    let countries = response
        .countries
        .ok_or(ValidationError::missing("countries"))?;

    let (index, country) = countries
        .into_iter()
        .enumerate()
        .find(|(_, c)| c.title.as_deref() == Some(target_country))
        .ok_or_else(|| ValidationError::CountryNotFound(target_country.to_string()))?;

    let country = convert_country(country).map_err(|e| e.within("countries", index))?;

    Ok(Catalog::new(country, creation_time))
}

fn convert_country(dto: CountryDto) -> Result<Country, ValidationError> {
    let title = dto.title.ok_or(ValidationError::missing("title"))?;
    let codes = convert_codes(dto.codes)?;
    let regions = convert_children(dto.regions, "regions", convert_region)?;

    Ok(Country {
        title,
        codes,
        regions,
    })
}

fn convert_region(dto: RegionDto) -> Result<Region, ValidationError> {
    let title = dto.title.ok_or(ValidationError::missing("title"))?;
    let codes = convert_codes(dto.codes)?;
    let settlements = convert_children(dto.settlements, "settlements", convert_settlement)?;

    Ok(Region {
        title,
        codes,
        settlements,
    })
}

fn convert_settlement(dto: SettlementDto) -> Result<Settlement, ValidationError> {
    let title = dto.title.ok_or(ValidationError::missing("title"))?;
    let codes = convert_codes(dto.codes)?;
    let stations = convert_children(dto.stations, "stations", convert_station)?;

    Ok(Settlement {
        title,
        codes,
        stations,
    })
}

fn convert_station(dto: StationDto) -> Result<Station, ValidationError> {
    let title = dto.title.ok_or(ValidationError::missing("title"))?;
    let codes = match (dto.codes, dto.code) {
        (None, Some(code)) => Codes::new(code, None),
        (codes, _) => convert_codes(codes)?,
    };

    let station_category = StationCategory::from_token(dto.station_type.as_deref())
        .map_err(|e| ValidationError::unknown("station_type", e))?;
    let transport_mode = TransportMode::from_token(dto.transport_type.as_deref())
        .map_err(|e| ValidationError::unknown("transport_type", e))?;

    Ok(Station {
        title,
        short_title: dto.short_title,
        popular_title: dto.popular_title,
        codes,
        direction: dto.direction,
        station_category,
        transport_mode,
        latitude: dto.latitude,
        longitude: dto.longitude,
    })
}

fn convert_codes(dto: Option<CodesDto>) -> Result<Codes, ValidationError> {
    let dto = dto.ok_or(ValidationError::missing("codes"))?;
    let primary = dto
        .yandex_code
        .ok_or(ValidationError::missing("codes.yandex_code"))?;

    Ok(Codes::new(primary, dto.esr_code))
}

/// Convert a `schedule` response.
///
/// The direction list is required. A missing `schedule` list is an empty
/// schedule, but every item in it must carry a complete thread.
pub fn convert_schedule(response: StationScheduleResponse) -> Result<Schedule, ValidationError> {
    let directions = convert_children(response.directions, "directions", convert_direction)?;
    let threads = response
        .schedule
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, item)| convert_schedule_item(item).map_err(|e| e.within("schedule", i)))
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(Schedule {
        directions,
        threads,
    })
}

fn convert_direction(dto: ScheduleDirectionDto) -> Result<ScheduleDirection, ValidationError> {
    Ok(ScheduleDirection {
        code: dto.code.ok_or(ValidationError::missing("code"))?,
        title: dto.title.ok_or(ValidationError::missing("title"))?,
    })
}

fn convert_schedule_item(dto: ScheduleItemDto) -> Result<RouteThread, ValidationError> {
    convert_thread(dto.thread.ok_or(ValidationError::missing("thread"))?)
}

fn convert_thread(dto: RouteThreadDto) -> Result<RouteThread, ValidationError> {
    let uid = dto.uid.ok_or(ValidationError::missing("thread.uid"))?;
    let title = dto.title.ok_or(ValidationError::missing("thread.title"))?;
    let number = dto.number.ok_or(ValidationError::missing("thread.number"))?;
    let transport_mode = TransportMode::from_token(dto.transport_type.as_deref())
        .map_err(|e| ValidationError::unknown("thread.transport_type", e))?;
    let subtype = convert_subtype(
        dto.transport_subtype
            .ok_or(ValidationError::missing("thread.transport_subtype"))?,
    )?;

    Ok(RouteThread {
        uid,
        number,
        title,
        is_express: dto.express_type.is_some(),
        transport_mode,
        subtype,
    })
}

fn convert_subtype(dto: TransportSubtypeDto) -> Result<TransportSubtype, ValidationError> {
    let code = dto
        .code
        .ok_or(ValidationError::missing("thread.transport_subtype.code"))?;
    let code = SubtypeCode::from_token(&code)
        .map_err(|e| ValidationError::unknown("thread.transport_subtype.code", e))?;

    Ok(TransportSubtype {
        code,
        title: dto
            .title
            .ok_or(ValidationError::missing("thread.transport_subtype.title"))?,
        color: dto
            .color
            .ok_or(ValidationError::missing("thread.transport_subtype.color"))?,
    })
}

/// Convert a required child list, stopping at the first failure.
fn convert_children<D, T>(
    children: Option<Vec<D>>,
    segment: &'static str,
    convert: fn(D) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    children
        .ok_or(ValidationError::missing(segment))?
        .into_iter()
        .enumerate()
        .map(|(i, child)| convert(child).map_err(|e| e.within(segment, i)))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Shape of a generated tree: regions → settlements → station count.
    type Shape = Vec<Vec<usize>>;

    fn shape() -> impl Strategy<Value = Shape> {
        prop::collection::vec(prop::collection::vec(0usize..4, 0..4), 0..4)
    }

    fn build(shape: &Shape) -> StationsListResponse {
        let codes = |c: String| {
            Some(CodesDto {
                yandex_code: Some(c),
                esr_code: None,
            })
        };
        let regions = shape
            .iter()
            .enumerate()
            .map(|(r, settlements)| RegionDto {
                title: Some(format!("r{r}")),
                codes: codes(format!("r{r}")),
                settlements: Some(
                    settlements
                        .iter()
                        .enumerate()
                        .map(|(s, &n)| SettlementDto {
                            title: Some(format!("c{r}-{s}")),
                            codes: codes(format!("c{r}-{s}")),
                            stations: Some(
                                (0..n)
                                    .map(|i| StationDto {
                                        title: Some(format!("s{r}-{s}-{i}")),
                                        short_title: None,
                                        popular_title: None,
                                        codes: codes(format!("s{r}-{s}-{i}")),
                                        code: None,
                                        direction: None,
                                        station_type: None,
                                        transport_type: Some("train".to_string()),
                                        latitude: None,
                                        longitude: None,
                                    })
                                    .collect(),
                            ),
                        })
                        .collect(),
                ),
            })
            .collect();

        StationsListResponse {
            countries: Some(vec![CountryDto {
                title: Some("T".to_string()),
                codes: codes("l1".to_string()),
                regions: Some(regions),
            }]),
        }
    }

    /// A field every node must carry.
    #[derive(Debug, Clone, Copy)]
    enum Required {
        Title,
        Codes,
        PrimaryCode,
        Children,
    }

    fn required() -> impl Strategy<Value = Required> {
        prop_oneof![
            Just(Required::Title),
            Just(Required::Codes),
            Just(Required::PrimaryCode),
            Just(Required::Children),
        ]
    }

    trait Node {
        fn title(&mut self) -> &mut Option<String>;
        fn codes(&mut self) -> &mut Option<CodesDto>;
        /// Drop the child list, returning its field name. Stations have none.
        fn drop_children(&mut self) -> Option<&'static str>;
    }

    impl Node for RegionDto {
        fn title(&mut self) -> &mut Option<String> {
            &mut self.title
        }
        fn codes(&mut self) -> &mut Option<CodesDto> {
            &mut self.codes
        }
        fn drop_children(&mut self) -> Option<&'static str> {
            self.settlements = None;
            Some("settlements")
        }
    }

    impl Node for SettlementDto {
        fn title(&mut self) -> &mut Option<String> {
            &mut self.title
        }
        fn codes(&mut self) -> &mut Option<CodesDto> {
            &mut self.codes
        }
        fn drop_children(&mut self) -> Option<&'static str> {
            self.stations = None;
            Some("stations")
        }
    }

    impl Node for StationDto {
        fn title(&mut self) -> &mut Option<String> {
            &mut self.title
        }
        fn codes(&mut self) -> &mut Option<CodesDto> {
            &mut self.codes
        }
        fn drop_children(&mut self) -> Option<&'static str> {
            None
        }
    }

    /// Remove `field` from `node` and return the name the validator reports.
    fn strike(node: &mut impl Node, field: Required) -> &'static str {
        match field {
            Required::Title => {
                *node.title() = None;
                "title"
            }
            Required::Codes => {
                *node.codes() = None;
                "codes"
            }
            Required::PrimaryCode => {
                if let Some(codes) = node.codes() {
                    codes.yandex_code = None;
                }
                "codes.yandex_code"
            }
            Required::Children => match node.drop_children() {
                Some(name) => name,
                None => strike(node, Required::Title),
            },
        }
    }

    /// Strike `field` from the `n`th node in pre-order (country excluded).
    fn strike_nth(
        raw: &mut StationsListResponse,
        mut n: usize,
        field: Required,
    ) -> Option<&'static str> {
        let country = &mut raw.countries.as_mut().unwrap()[0];
        for region in country.regions.as_mut().unwrap() {
            if n == 0 {
                return Some(strike(region, field));
            }
            n -= 1;
            for settlement in region.settlements.as_mut().unwrap() {
                if n == 0 {
                    return Some(strike(settlement, field));
                }
                n -= 1;
                for station in settlement.stations.as_mut().unwrap() {
                    if n == 0 {
                        return Some(strike(station, field));
                    }
                    n -= 1;
                }
            }
        }
        None
    }

    proptest! {
        /// Complete trees convert with counts and order intact
        #[test]
        fn shape_is_preserved(shape in shape()) {
            let catalog = convert_catalog(build(&shape), "T", Utc::now()).unwrap();
            let country = catalog.country();

            prop_assert_eq!(country.regions.len(), shape.len());
            for (r, region) in country.regions.iter().enumerate() {
                prop_assert_eq!(&region.title, &format!("r{r}"));
                prop_assert_eq!(region.settlements.len(), shape[r].len());
                for (s, settlement) in region.settlements.iter().enumerate() {
                    prop_assert_eq!(settlement.stations.len(), shape[r][s]);
                    for (i, station) in settlement.stations.iter().enumerate() {
                        prop_assert_eq!(station.codes.primary(), format!("s{r}-{s}-{i}"));
                    }
                }
            }
        }

        /// A single missing required field anywhere fails the whole tree
        #[test]
        fn any_missing_field_fails(
            shape in shape(),
            pick in 0usize..64,
            field in required(),
        ) {
            let mut raw = build(&shape);
            let nodes: usize = shape.iter().map(|s| 1 + s.len() + s.iter().sum::<usize>()).sum();
            prop_assume!(nodes > 0);

            let expected = strike_nth(&mut raw, pick % nodes, field);
            prop_assert!(expected.is_some());
            let result = convert_catalog(raw, "T", Utc::now());
            let reported = match result {
                Err(ValidationError::MissingField { field, .. }) => Some(field),
                _ => None,
            };
            prop_assert_eq!(reported, expected);
        }
    }
}
