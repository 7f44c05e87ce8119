use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Flight Offers Search response (v2)
// ============================================================================

/// A decoded `GET/POST /v2/shopping/flight-offers` body.
///
/// Offers that do not match [`FlightOffer`] are dropped while decoding and
/// counted in `skipped`, so one bad record never fails the whole page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersResponse {
    pub meta: Option<CollectionMeta>,
    pub data: Vec<FlightOffer>,
    pub dictionaries: Dictionaries,
    pub warnings: Vec<Issue>,
    #[serde(skip)]
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    meta: Option<CollectionMeta>,
    #[serde(default)]
    data: Vec<serde_json::Value>,
    #[serde(default)]
    dictionaries: Dictionaries,
    #[serde(default)]
    warnings: Vec<Issue>,
}

impl FlightOffersResponse {
    pub fn from_value(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        let envelope: RawEnvelope = serde_json::from_value(body)?;

        let mut data = Vec::with_capacity(envelope.data.len());
        let mut skipped = 0;
        for raw in envelope.data {
            match serde_json::from_value::<FlightOffer>(raw) {
                Ok(offer) => data.push(offer),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Dropping flight offer that does not match schema: {}", e);
                }
            }
        }

        Ok(Self {
            meta: envelope.meta,
            data,
            dictionaries: envelope.dictionaries,
            warnings: envelope.warnings,
            skipped,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    #[serde(default)]
    pub count: usize,
    pub links: Option<HashMap<String, String>>,
}

/// Provider-side problem report, used both for warnings and error bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub status: Option<u16>,
    pub code: Option<i64>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.as_deref().unwrap_or("Unknown error");
        match (&self.code, &self.detail) {
            (Some(code), Some(detail)) => write!(f, "[{}] {}: {}", code, title, detail),
            (Some(code), None) => write!(f, "[{}] {}", code, title),
            (None, Some(detail)) => write!(f, "{}: {}", title, detail),
            (None, None) => f.write_str(title),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<Issue>,
}

impl ErrorResponse {
    /// Joins every issue into a single line for error messages.
    pub fn summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

// ============================================================================
// Flight Offer
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub instant_ticketing_required: bool,
    #[serde(default)]
    pub non_homogeneous: bool,
    #[serde(default)]
    pub one_way: bool,
    pub last_ticketing_date: Option<String>,
    #[serde(default)]
    pub number_of_bookable_seats: u32,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
    pub price: Price,
    pub pricing_options: Option<PricingOptions>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
    #[serde(default)]
    pub traveler_pricings: Vec<TravelerPricing>,
}

impl FlightOffer {
    /// Fare details of the first traveler on the first segment, which carry
    /// the cabin and baggage allowance shown for the whole offer.
    pub fn primary_fare_details(&self) -> Option<&FareDetailsBySegment> {
        self.traveler_pricings
            .first()
            .and_then(|pricing| pricing.fare_details_by_segment.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// ISO8601 duration, e.g. `PT9H15M`
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: Option<String>,
    pub departure: FlightEndPoint,
    pub arrival: FlightEndPoint,
    pub carrier_code: String,
    pub number: String,
    pub aircraft: AircraftEquipment,
    pub operating: Option<OperatingFlight>,
    pub duration: Option<String>,
    pub number_of_stops: Option<u32>,
    #[serde(rename = "blacklistedInEU")]
    pub blacklisted_in_eu: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndPoint {
    pub iata_code: String,
    pub terminal: Option<String>,
    /// Local datetime at the airport, e.g. `2025-06-01T21:50:00`
    pub at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftEquipment {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingFlight {
    pub carrier_code: Option<String>,
}

// ============================================================================
// Pricing
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub currency: Option<String>,
    pub total: String,
    pub base: Option<String>,
    #[serde(default)]
    pub fees: Vec<Fee>,
    pub grand_total: Option<String>,
    pub billing_currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fee {
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOptions {
    #[serde(default)]
    pub fare_type: Vec<String>,
    pub included_checked_bags_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPricing {
    pub traveler_id: String,
    pub fare_option: Option<String>,
    pub traveler_type: TravelerType,
    pub price: Option<Price>,
    #[serde(default)]
    pub fare_details_by_segment: Vec<FareDetailsBySegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareDetailsBySegment {
    pub segment_id: String,
    pub cabin: Option<TravelClass>,
    pub fare_basis: Option<String>,
    pub branded_fare: Option<String>,
    #[serde(rename = "class")]
    pub booking_class: Option<String>,
    pub included_checked_bags: Option<BaggageAllowance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaggageAllowance {
    pub quantity: Option<u32>,
    pub weight: Option<u32>,
    pub weight_unit: Option<String>,
}

// ============================================================================
// Dictionaries
// ============================================================================

/// Code to display-name tables returned alongside search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pub locations: HashMap<String, LocationValue>,
    #[serde(default)]
    pub aircraft: HashMap<String, String>,
    #[serde(default)]
    pub currencies: HashMap<String, String>,
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationValue {
    pub city_code: Option<String>,
    pub country_code: Option<String>,
}

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ECONOMY" => Ok(TravelClass::Economy),
            "PREMIUM_ECONOMY" => Ok(TravelClass::PremiumEconomy),
            "BUSINESS" => Ok(TravelClass::Business),
            "FIRST" => Ok(TravelClass::First),
            other => Err(format!(
                "Unknown travel class '{}': expected ECONOMY, PREMIUM_ECONOMY, BUSINESS or FIRST",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelerType {
    Adult,
    Child,
    Senior,
    Young,
    HeldInfant,
    SeatedInfant,
    Student,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Coverage {
    MostSegments,
    AtLeastOneSegment,
    AllSegments,
}

// ============================================================================
// Flight Offers Search POST request
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersPostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    pub origin_destinations: Vec<OriginDestination>,
    pub travelers: Vec<TravelerInfo>,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_criteria: Option<SearchCriteria>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginDestination {
    pub id: String,
    pub origin_location_code: String,
    pub destination_location_code: String,
    pub departure_date_time_range: DateTimeRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeRange {
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerInfo {
    pub id: String,
    pub traveler_type: TravelerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_adult_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_flight_offers: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_filters: Option<FlightFilters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cabin_restrictions: Vec<CabinRestriction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_restriction: Option<ConnectionRestriction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinRestriction {
    pub cabin: TravelClass,
    pub coverage: Coverage,
    pub origin_destination_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRestriction {
    pub max_number_of_connections: u8,
}

// ============================================================================
// Flight Offers Price
// ============================================================================

pub const PRICING_REQUEST_TYPE: &str = "flight-offers-pricing";

/// `POST /v1/shopping/flight-offers/pricing` body. Offers are forwarded
/// exactly as the search returned them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOffersPricingRequest {
    pub data: PricingRequestData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequestData {
    #[serde(rename = "type")]
    pub kind: String,
    pub flight_offers: Vec<serde_json::Value>,
}

impl FlightOffersPricingRequest {
    pub fn new(flight_offers: Vec<serde_json::Value>) -> Self {
        Self {
            data: PricingRequestData {
                kind: PRICING_REQUEST_TYPE.to_string(),
                flight_offers,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersPricingResponse {
    pub data: PricedOffers,
    #[serde(default)]
    pub dictionaries: Dictionaries,
    #[serde(default)]
    pub warnings: Vec<Issue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOffers {
    #[serde(default)]
    pub flight_offers: Vec<FlightOffer>,
    /// Traveler details the provider needs before booking, passed through
    pub booking_requirements: Option<serde_json::Value>,
}

// ============================================================================
// Authentication & reference data
// ============================================================================

/// OAuth2 client-credentials token response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirlinesResponse {
    #[serde(default)]
    pub data: Vec<AirlineRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineRecord {
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub business_name: Option<String>,
    pub common_name: Option<String>,
}
