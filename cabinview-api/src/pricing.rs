use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use cabinview_core::amadeus::{FlightOffersPricingRequest, Issue};
use cabinview_offer::OfferSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::search::SOURCE;
use crate::state::AppState;

// Provider limit per pricing request
const MAX_PRICED_OFFERS: usize = 6;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Offers exactly as a search returned them upstream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBody {
    #[serde(default)]
    pub flight_offers: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub data: Vec<OfferSummary>,
    pub booking_requirements: Option<Value>,
    pub meta: PricingMeta,
    pub warnings: Vec<Issue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingMeta {
    pub count: usize,
    pub source: &'static str,
    pub skipped: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/flights/pricing", post(price_offers))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/flights/pricing
/// Re-prices up to six offers before booking
pub async fn price_offers(
    State(state): State<AppState>,
    body: Result<Json<PricingBody>, JsonRejection>,
) -> Result<Json<PricingResponse>, AppError> {
    let Json(body) = body?;
    validate_offers(&body.flight_offers)?;

    let request = FlightOffersPricingRequest::new(body.flight_offers);
    let response = state.supplier.price_offers(&request).await?;

    let priced = &response.data.flight_offers;
    let data = state
        .transformer
        .transform_offers(priced, Some(&response.dictionaries));
    let skipped = priced.len() - data.len();
    tracing::info!("Priced {} offers ({} not displayable)", data.len(), skipped);

    Ok(Json(PricingResponse {
        meta: PricingMeta {
            count: data.len(),
            source: SOURCE,
            skipped,
        },
        data,
        booking_requirements: response.data.booking_requirements,
        warnings: response.warnings,
    }))
}

fn validate_offers(offers: &[Value]) -> Result<(), AppError> {
    if offers.is_empty() {
        return Err(AppError::Validation("flightOffers must contain at least one offer".to_string()));
    }
    if offers.len() > MAX_PRICED_OFFERS {
        return Err(AppError::Validation(format!(
            "At most {} flight offers can be priced at once",
            MAX_PRICED_OFFERS
        )));
    }
    if let Some(index) = offers.iter().position(|offer| !offer.is_object()) {
        return Err(AppError::Validation(format!(
            "flightOffers[{}] must be a flight offer object",
            index
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_offers() {
        assert!(validate_offers(&[json!({ "id": "1" })]).is_ok());
        assert!(validate_offers(&[]).is_err());
        assert!(validate_offers(&vec![json!({ "id": "1" }); 7]).is_err());
        assert!(matches!(
            validate_offers(&[json!({ "id": "1" }), json!("2")]),
            Err(AppError::Validation(msg)) if msg.contains("flightOffers[1]")
        ));
    }
}
