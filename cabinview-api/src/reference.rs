use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use cabinview_core::amadeus::AirlineRecord;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

// Provider limit per airline lookup
const MAX_AIRLINE_CODES: usize = 20;

#[derive(Debug, Serialize)]
pub struct AirlinesResponse {
    pub data: Vec<AirlineRecord>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reference/airlines/{codes}", get(airlines))
        .route("/api/reference/aircraft/{code}", get(aircraft))
}

/// GET /api/reference/airlines/{codes}
/// `codes` is a comma separated list such as `LH,QR`
pub async fn airlines(
    State(state): State<AppState>,
    Path(codes): Path<String>,
) -> Result<Json<AirlinesResponse>, AppError> {
    let codes = parse_airline_codes(&codes)?;
    let data = state.supplier.airlines(&codes).await?;
    Ok(Json(AirlinesResponse { data }))
}

/// GET /api/reference/aircraft/{code}
/// Returns the provider's record for a 3-character equipment code such as `359`
pub async fn aircraft(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let code = parse_aircraft_code(&code)?;
    let body = state.supplier.aircraft(&code).await?;
    Ok(Json(body))
}

fn parse_aircraft_code(raw: &str) -> Result<String, AppError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        Ok(code)
    } else {
        Err(AppError::Validation(format!(
            "Invalid aircraft code '{}': expected a 3-character IATA code",
            raw.trim()
        )))
    }
}

fn parse_airline_codes(raw: &str) -> Result<Vec<String>, AppError> {
    let codes: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .collect();

    if codes.is_empty() {
        return Err(AppError::Validation("At least one airline code is required".to_string()));
    }
    if codes.len() > MAX_AIRLINE_CODES {
        return Err(AppError::Validation(format!(
            "At most {} airline codes per request",
            MAX_AIRLINE_CODES
        )));
    }
    if let Some(bad) = codes
        .iter()
        .find(|c| c.len() != 2 || !c.chars().all(|ch| ch.is_ascii_alphanumeric()))
    {
        return Err(AppError::Validation(format!(
            "Invalid airline code '{}': expected a 2-character IATA code",
            bad
        )));
    }
    Ok(codes)
}
