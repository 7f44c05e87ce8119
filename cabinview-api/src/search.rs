use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Json, Router,
};
use cabinview_core::amadeus::Issue;
use cabinview_core::search::{SearchBody, SearchQuery};
use cabinview_core::{FlightOffersResponse, SearchParams};
use cabinview_offer::OfferSummary;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

pub const SOURCE: &str = "amadeus";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: Vec<OfferSummary>,
    pub meta: SearchMeta,
    pub warnings: Vec<Issue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub count: usize,
    pub search_time_ms: u64,
    pub source: &'static str,
    /// Offers the provider returned that could not be displayed
    pub skipped: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/flights/search", get(search_flights).post(search_flights_post))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/flights/search
pub async fn search_flights(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(query) = query?;
    let params = SearchParams::try_from(query)?;
    let started = Instant::now();

    let response = state.supplier.search_offers(&params).await?;
    Ok(Json(respond(&state, &params, response, started)))
}

/// POST /api/flights/search
/// Same validation as GET, forwarded upstream as a structured search
pub async fn search_flights_post(
    State(state): State<AppState>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(body) = body?;
    let params = SearchParams::try_from(body)?;
    let started = Instant::now();

    let response = state
        .supplier
        .search_offers_post(&params.to_post_request())
        .await?;
    Ok(Json(respond(&state, &params, response, started)))
}

fn respond(
    state: &AppState,
    params: &SearchParams,
    response: FlightOffersResponse,
    started: Instant,
) -> SearchResponse {
    let data = state
        .transformer
        .transform_offers(&response.data, Some(&response.dictionaries));
    let skipped = response.skipped + (response.data.len() - data.len());
    let search_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::info!(
        "Search {} -> {} on {}: {} offers in {}ms",
        params.origin,
        params.destination,
        params.departure_date,
        data.len(),
        search_time_ms
    );

    SearchResponse {
        meta: SearchMeta {
            count: data.len(),
            search_time_ms,
            source: SOURCE,
            skipped,
        },
        data,
        warnings: response.warnings,
    }
}
