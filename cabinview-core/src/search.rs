use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::amadeus::{
    CabinRestriction, ConnectionRestriction, Coverage, DateTimeRange, FlightFilters,
    FlightOffersPostRequest, OriginDestination, SearchCriteria, TravelClass, TravelerInfo,
    TravelerType,
};
use crate::{CoreError, CoreResult};

pub const MIN_ADULTS: u8 = 1;
pub const MAX_ADULTS: u8 = 9;
/// Adults and children together; infants ride on an adult's lap
pub const MAX_SEATED_TRAVELERS: u8 = 9;
pub const MIN_RESULTS: u16 = 1;
pub const MAX_RESULTS: u16 = 250;
pub const DEFAULT_MAX_RESULTS: u16 = 50;

static IATA_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid IATA code pattern"));
static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency code pattern"));
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// Query string of `GET /api/flights/search`. Everything arrives as text so
/// that bad values produce our own messages instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub return_date: Option<String>,
    #[serde(alias = "class")]
    pub travel_class: Option<String>,
    pub non_stop: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,
    pub infants: Option<String>,
    #[serde(alias = "currency")]
    pub currency_code: Option<String>,
    pub max_price: Option<String>,
    pub max: Option<String>,
}

/// JSON body of `POST /api/flights/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(alias = "date")]
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    #[serde(alias = "cabinClass")]
    pub travel_class: Option<String>,
    pub non_stop: Option<bool>,
    #[serde(alias = "passengers")]
    pub adults: Option<i64>,
    pub children: Option<i64>,
    pub infants: Option<i64>,
    #[serde(alias = "currency")]
    pub currency_code: Option<String>,
    pub max_price: Option<i64>,
    pub max: Option<i64>,
}

/// A validated flight search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub travel_class: Option<TravelClass>,
    pub non_stop: Option<bool>,
    pub adults: u8,
    /// Travelers aged 2 to 11, each with their own seat
    pub children: u8,
    /// Travelers under 2, each held by an adult
    pub infants: u8,
    /// ISO 4217 currency the provider should price in
    pub currency_code: Option<String>,
    /// Upper bound on the total price per traveler, in `currency_code`
    pub max_price: Option<u32>,
    pub max_results: u16,
}

impl SearchParams {
    /// A one-way search for `adults` adults with every optional filter unset.
    pub fn new(origin: &str, destination: &str, departure_date: NaiveDate, adults: u8) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date,
            return_date: None,
            travel_class: None,
            non_stop: None,
            adults,
            children: 0,
            infants: 0,
            currency_code: None,
            max_price: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

// Both inbound shapes, after per-shape parsing of their text fields
struct RawSearch {
    origin: Option<String>,
    destination: Option<String>,
    departure_date: Option<String>,
    return_date: Option<String>,
    travel_class: Option<String>,
    non_stop: Option<bool>,
    adults: Option<i64>,
    children: Option<i64>,
    infants: Option<i64>,
    currency_code: Option<String>,
    max_price: Option<i64>,
    max: Option<i64>,
}

impl TryFrom<SearchQuery> for SearchParams {
    type Error = CoreError;

    fn try_from(query: SearchQuery) -> CoreResult<Self> {
        require_fields(&[
            ("origin", query.origin.as_deref()),
            ("destination", query.destination.as_deref()),
            ("date", query.date.as_deref()),
        ])?;

        let non_stop = match query.non_stop.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(v) if v.eq_ignore_ascii_case("true") => Some(true),
            Some(v) if v.eq_ignore_ascii_case("false") => Some(false),
            Some(v) => {
                return Err(CoreError::ValidationError(format!(
                    "nonStop must be true or false, got '{}'",
                    v
                )))
            }
        };

        Self::build(RawSearch {
            origin: query.origin,
            destination: query.destination,
            departure_date: query.date,
            return_date: query.return_date,
            travel_class: query.travel_class,
            non_stop,
            adults: parse_integer("adults", query.adults)?,
            children: parse_integer("children", query.children)?,
            infants: parse_integer("infants", query.infants)?,
            currency_code: query.currency_code,
            max_price: parse_integer("maxPrice", query.max_price)?,
            max: parse_integer("max", query.max)?,
        })
    }
}

impl TryFrom<SearchBody> for SearchParams {
    type Error = CoreError;

    fn try_from(body: SearchBody) -> CoreResult<Self> {
        require_fields(&[
            ("origin", body.origin.as_deref()),
            ("destination", body.destination.as_deref()),
            ("departureDate", body.departure_date.as_deref()),
        ])?;

        Self::build(RawSearch {
            origin: body.origin,
            destination: body.destination,
            departure_date: body.departure_date,
            return_date: body.return_date,
            travel_class: body.travel_class,
            non_stop: body.non_stop,
            adults: body.adults,
            children: body.children,
            infants: body.infants,
            currency_code: body.currency_code,
            max_price: body.max_price,
            max: body.max,
        })
    }
}

impl SearchParams {
    fn build(raw: RawSearch) -> CoreResult<Self> {
        let origin = airport_code("origin", raw.origin.unwrap_or_default())?;
        let destination = airport_code("destination", raw.destination.unwrap_or_default())?;
        if origin == destination {
            return Err(CoreError::ValidationError(
                "origin and destination must differ".to_string(),
            ));
        }

        let departure_date = iso_date("date", &raw.departure_date.unwrap_or_default())?;
        let return_date = match raw.return_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(iso_date("returnDate", value)?),
        };
        if let Some(ret) = return_date {
            if ret < departure_date {
                return Err(CoreError::ValidationError(
                    "returnDate must not be before the departure date".to_string(),
                ));
            }
        }

        let travel_class = match raw.travel_class.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<TravelClass>().map_err(CoreError::ValidationError)?),
        };

        let adults = raw
            .adults
            .unwrap_or(MIN_ADULTS as i64)
            .clamp(MIN_ADULTS as i64, MAX_ADULTS as i64) as u8;
        let children = traveler_count("children", raw.children)?;
        let infants = traveler_count("infants", raw.infants)?;
        if adults + children > MAX_SEATED_TRAVELERS {
            return Err(CoreError::ValidationError(format!(
                "adults and children together must not exceed {}",
                MAX_SEATED_TRAVELERS
            )));
        }
        if infants > adults {
            return Err(CoreError::ValidationError(
                "infants must not outnumber adults".to_string(),
            ));
        }

        let currency_code = match raw.currency_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_currency(value)?),
        };
        let max_price = match raw.max_price {
            None => None,
            Some(price) if price > 0 => Some(u32::try_from(price).unwrap_or(u32::MAX)),
            Some(price) => {
                return Err(CoreError::ValidationError(format!(
                    "maxPrice must be a positive whole number, got {}",
                    price
                )))
            }
        };

        let max_results = raw
            .max
            .unwrap_or(DEFAULT_MAX_RESULTS as i64)
            .clamp(MIN_RESULTS as i64, MAX_RESULTS as i64) as u16;

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            travel_class,
            non_stop: raw.non_stop,
            adults,
            children,
            infants,
            currency_code,
            max_price,
            max_results,
        })
    }

    /// Query pairs for `GET /v2/shopping/flight-offers`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("originLocationCode", self.origin.clone()),
            ("destinationLocationCode", self.destination.clone()),
            ("departureDate", self.departure_date.to_string()),
            ("adults", self.adults.to_string()),
        ];
        if let Some(ret) = self.return_date {
            pairs.push(("returnDate", ret.to_string()));
        }
        if self.children > 0 {
            pairs.push(("children", self.children.to_string()));
        }
        if self.infants > 0 {
            pairs.push(("infants", self.infants.to_string()));
        }
        if let Some(class) = self.travel_class {
            pairs.push(("travelClass", class.as_str().to_string()));
        }
        if let Some(non_stop) = self.non_stop {
            pairs.push(("nonStop", non_stop.to_string()));
        }
        if let Some(currency) = &self.currency_code {
            pairs.push(("currencyCode", currency.clone()));
        }
        if let Some(price) = self.max_price {
            pairs.push(("maxPrice", price.to_string()));
        }
        pairs.push(("max", self.max_results.to_string()));
        pairs
    }

    /// Travelers numbered from 1: adults, then children, then infants each
    /// attached to the adult with the same position.
    fn travelers(&self) -> Vec<TravelerInfo> {
        let adults = (1..=self.adults).map(|n| TravelerInfo {
            id: n.to_string(),
            traveler_type: TravelerType::Adult,
            associated_adult_id: None,
        });
        let children = (1..=self.children).map(|n| TravelerInfo {
            id: (self.adults + n).to_string(),
            traveler_type: TravelerType::Child,
            associated_adult_id: None,
        });
        let seated = self.adults + self.children;
        let infants = (1..=self.infants).map(move |n| TravelerInfo {
            id: (u16::from(seated) + u16::from(n)).to_string(),
            traveler_type: TravelerType::HeldInfant,
            associated_adult_id: Some(n.to_string()),
        });
        adults.chain(children).chain(infants).collect()
    }

    /// Structured body for `POST /v2/shopping/flight-offers`.
    pub fn to_post_request(&self) -> FlightOffersPostRequest {
        let mut origin_destinations = vec![OriginDestination {
            id: "1".to_string(),
            origin_location_code: self.origin.clone(),
            destination_location_code: self.destination.clone(),
            departure_date_time_range: DateTimeRange {
                date: self.departure_date.to_string(),
                time: None,
            },
        }];
        if let Some(ret) = self.return_date {
            origin_destinations.push(OriginDestination {
                id: "2".to_string(),
                origin_location_code: self.destination.clone(),
                destination_location_code: self.origin.clone(),
                departure_date_time_range: DateTimeRange {
                    date: ret.to_string(),
                    time: None,
                },
            });
        }

        let cabin_restrictions = self
            .travel_class
            .map(|cabin| {
                vec![CabinRestriction {
                    cabin,
                    coverage: Coverage::MostSegments,
                    origin_destination_ids: origin_destinations.iter().map(|od| od.id.clone()).collect(),
                }]
            })
            .unwrap_or_default();
        let connection_restriction = match self.non_stop {
            Some(true) => Some(ConnectionRestriction { max_number_of_connections: 0 }),
            _ => None,
        };
        let flight_filters = if cabin_restrictions.is_empty() && connection_restriction.is_none() {
            None
        } else {
            Some(FlightFilters {
                cabin_restrictions,
                connection_restriction,
            })
        };

        FlightOffersPostRequest {
            currency_code: self.currency_code.clone(),
            origin_destinations,
            travelers: self.travelers(),
            sources: vec!["GDS".to_string()],
            search_criteria: Some(SearchCriteria {
                max_flight_offers: Some(self.max_results),
                max_price: self.max_price,
                flight_filters,
            }),
        }
    }
}

fn require_fields(fields: &[(&str, Option<&str>)]) -> CoreResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.map(str::trim).unwrap_or_default().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "Missing required parameters: {}",
            missing.join(", ")
        )))
    }
}

fn airport_code(field: &str, raw: String) -> CoreResult<String> {
    let code = raw.trim().to_ascii_uppercase();
    if IATA_CODE.is_match(&code) {
        Ok(code)
    } else {
        Err(CoreError::ValidationError(format!(
            "{} must be a 3-letter IATA airport code, got '{}'",
            field,
            raw.trim()
        )))
    }
}

fn iso_date(field: &str, raw: &str) -> CoreResult<NaiveDate> {
    let raw = raw.trim();
    if !ISO_DATE.is_match(raw) {
        return Err(CoreError::ValidationError(format!(
            "{} must be formatted as YYYY-MM-DD, got '{}'",
            field, raw
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CoreError::ValidationError(format!("{} is not a valid calendar date: '{}'", field, raw))
    })
}

fn parse_currency(raw: &str) -> CoreResult<String> {
    let code = raw.to_ascii_uppercase();
    if CURRENCY_CODE.is_match(&code) {
        Ok(code)
    } else {
        Err(CoreError::ValidationError(format!(
            "currencyCode must be a 3-letter ISO 4217 code, got '{}'",
            raw
        )))
    }
}

fn traveler_count(field: &str, raw: Option<i64>) -> CoreResult<u8> {
    match raw {
        None => Ok(0),
        Some(n) if (0..=MAX_SEATED_TRAVELERS as i64).contains(&n) => Ok(n as u8),
        Some(n) => Err(CoreError::ValidationError(format!(
            "{} must be between 0 and {}, got {}",
            field, MAX_SEATED_TRAVELERS, n
        ))),
    }
}

fn parse_integer(field: &str, raw: Option<String>) -> CoreResult<Option<i64>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<i64>().map(Some).map_err(|_| {
            CoreError::ValidationError(format!("{} must be a whole number, got '{}'", field, v))
        }),
    }
}
