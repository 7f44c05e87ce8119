use cabinview_catalog::{CabinSpecs, FeatureIndicators};
use cabinview_core::TravelClass;
use serde::Serialize;

/// A flight offer flattened for display.
///
/// Optional values serialize as `null` rather than disappearing, so clients
/// see the same keys on every offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    pub id: String,
    pub price: SummaryPrice,
    /// Display name of the primary (validating) carrier
    pub validating_carrier: String,
    pub itineraries: Vec<ItinerarySummary>,
    pub number_of_bookable_seats: u32,
    pub included_checked_bags: Option<String>,
    pub travel_class: Option<TravelClass>,
    pub cabin_specs: Option<&'static CabinSpecs>,
    pub features: Option<FeatureIndicators>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPrice {
    pub total: f64,
    pub currency: String,
}

/// One direction of travel: outbound first, then return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySummary {
    pub duration: String,
    pub stop_count: usize,
    pub segments: Vec<SegmentSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub departure_airport: String,
    /// `HH:MM`, local to the departure airport
    pub departure_time: String,
    pub arrival_airport: String,
    /// `HH:MM`, local to the arrival airport
    pub arrival_time: String,
    pub carrier_code: String,
    pub carrier_name: String,
    pub flight_number: String,
    pub aircraft_code: String,
    pub aircraft: String,
    pub duration: Option<String>,
}

impl ItinerarySummary {
    pub fn is_non_stop(&self) -> bool {
        self.stop_count == 0
    }
}
