use std::collections::HashMap;

use cabinview_catalog::{cabin, FeatureIndicators};
use cabinview_core::amadeus::{BaggageAllowance, FlightOffer, Itinerary, Price, Segment};
use cabinview_core::{Dictionaries, TravelClass};

use crate::duration::{format_duration, format_time, stop_count};
use crate::models::{ItinerarySummary, OfferSummary, SegmentSummary, SummaryPrice};

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("Offer {0} has no itineraries")]
    MissingItineraries(String),

    #[error("Offer {0} has no segments in its outbound itinerary")]
    MissingSegments(String),

    #[error("Offer {offer_id} has an unparseable total price '{total}'")]
    InvalidPrice { offer_id: String, total: String },
}

/// Turns provider offers into [`OfferSummary`] values.
///
/// Stateless apart from its options; the same input always yields the same
/// output.
#[derive(Debug, Clone, Default)]
pub struct OfferTransformer {
    enrich_cabin_specs: bool,
}

impl OfferTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach cabin specs and feature indicators to every summary
    pub fn with_cabin_specs(mut self, enabled: bool) -> Self {
        self.enrich_cabin_specs = enabled;
        self
    }

    /// Transform a batch. Malformed offers are logged and left out.
    pub fn transform_offers(
        &self,
        offers: &[FlightOffer],
        dictionaries: Option<&Dictionaries>,
    ) -> Vec<OfferSummary> {
        offers
            .iter()
            .filter_map(|offer| match self.transform_offer(offer, dictionaries) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!("Skipping flight offer: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn transform_offer(
        &self,
        offer: &FlightOffer,
        dictionaries: Option<&Dictionaries>,
    ) -> Result<OfferSummary, TransformError> {
        let outbound = offer
            .itineraries
            .first()
            .ok_or_else(|| TransformError::MissingItineraries(offer.id.clone()))?;
        let first_segment = outbound
            .segments
            .first()
            .ok_or_else(|| TransformError::MissingSegments(offer.id.clone()))?;

        let carriers = dictionaries.map(|d| &d.carriers);
        let aircraft = dictionaries.map(|d| &d.aircraft);

        let fare = offer.primary_fare_details();
        let travel_class = fare.and_then(|f| f.cabin);
        let included_checked_bags = fare
            .and_then(|f| f.included_checked_bags.as_ref())
            .and_then(format_baggage);

        let primary_carrier = offer
            .validating_airline_codes
            .first()
            .unwrap_or(&first_segment.carrier_code);

        let (cabin_specs, features) = if self.enrich_cabin_specs {
            let cabin_name = travel_class.unwrap_or(TravelClass::Business).as_str();
            let specs = cabin::lookup(&first_segment.carrier_code, &first_segment.aircraft.code, cabin_name);
            (Some(specs), Some(FeatureIndicators::extract(specs)))
        } else {
            (None, None)
        };

        Ok(OfferSummary {
            id: offer.id.clone(),
            price: normalize_price(&offer.id, &offer.price)?,
            validating_carrier: resolve(carriers, primary_carrier),
            itineraries: offer
                .itineraries
                .iter()
                .map(|itinerary| summarize_itinerary(itinerary, carriers, aircraft))
                .collect(),
            number_of_bookable_seats: offer.number_of_bookable_seats,
            included_checked_bags,
            travel_class,
            cabin_specs,
            features,
        })
    }
}

/// Convenience wrapper over [`OfferTransformer::transform_offers`] without enrichment.
pub fn transform_offers(offers: &[FlightOffer], dictionaries: Option<&Dictionaries>) -> Vec<OfferSummary> {
    OfferTransformer::new().transform_offers(offers, dictionaries)
}

fn summarize_itinerary(
    itinerary: &Itinerary,
    carriers: Option<&HashMap<String, String>>,
    aircraft: Option<&HashMap<String, String>>,
) -> ItinerarySummary {
    ItinerarySummary {
        duration: itinerary
            .duration
            .as_deref()
            .map(format_duration)
            .unwrap_or_default(),
        stop_count: stop_count(itinerary.segments.len()),
        segments: itinerary
            .segments
            .iter()
            .map(|segment| summarize_segment(segment, carriers, aircraft))
            .collect(),
    }
}

fn summarize_segment(
    segment: &Segment,
    carriers: Option<&HashMap<String, String>>,
    aircraft: Option<&HashMap<String, String>>,
) -> SegmentSummary {
    SegmentSummary {
        departure_airport: segment.departure.iata_code.clone(),
        departure_time: format_time(&segment.departure.at),
        arrival_airport: segment.arrival.iata_code.clone(),
        arrival_time: format_time(&segment.arrival.at),
        carrier_code: segment.carrier_code.clone(),
        carrier_name: resolve(carriers, &segment.carrier_code),
        flight_number: format!("{}{}", segment.carrier_code, segment.number),
        aircraft_code: segment.aircraft.code.clone(),
        aircraft: resolve(aircraft, &segment.aircraft.code),
        duration: segment.duration.as_deref().map(format_duration),
    }
}

/// Display name for a code, or the code itself when the dictionary has no entry.
pub fn resolve(dictionary: Option<&HashMap<String, String>>, code: &str) -> String {
    dictionary
        .and_then(|d| d.get(code))
        .cloned()
        .unwrap_or_else(|| code.to_string())
}

/// `23KG`, `2 pc`, or nothing when the allowance carries neither.
pub fn format_baggage(allowance: &BaggageAllowance) -> Option<String> {
    if let Some(weight) = allowance.weight {
        let unit = allowance.weight_unit.as_deref().unwrap_or_default();
        return Some(format!("{}{}", weight, unit));
    }
    allowance.quantity.map(|quantity| format!("{} pc", quantity))
}

fn normalize_price(offer_id: &str, price: &Price) -> Result<SummaryPrice, TransformError> {
    let total = price
        .total
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| TransformError::InvalidPrice {
            offer_id: offer_id.to_string(),
            total: price.total.clone(),
        })?;

    let currency = price
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| price.base.as_deref().and_then(currency_prefix))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    Ok(SummaryPrice { total, currency })
}

/// Leading ISO 4217 code of a fare string such as `EUR 700.00`.
fn currency_prefix(base: &str) -> Option<String> {
    let base = base.trim_start();
    let end = base
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(base.len());
    let code = &base[..end];
    (code.len() == 3).then(|| code.to_ascii_uppercase())
}
