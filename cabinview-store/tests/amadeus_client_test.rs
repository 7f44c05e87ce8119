//! Drives the real reqwest client against a local axum stand-in for Amadeus.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use cabinview_core::amadeus::{FlightOffersPostRequest, FlightOffersPricingRequest};
use cabinview_core::{FlightSupplier, SearchParams, SupplierError, TravelClass};
use cabinview_store::{AmadeusClient, AmadeusConfig, RetryPolicy};
use chrono::NaiveDate;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Upstream {
    token_calls: Arc<AtomicUsize>,
    search_calls: Arc<AtomicUsize>,
    // Searches answered with 503 before the first success
    failures_left: Arc<AtomicUsize>,
    reject_credentials: bool,
    // Token endpoint answers 503 to every request
    token_unavailable: bool,
    reject_search: bool,
    last_query: Arc<Mutex<HashMap<String, String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl Upstream {
    fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

fn offers_body() -> Value {
    json!({
        "meta": { "count": 2 },
        "data": [
            {
                "type": "flight-offer",
                "id": "1",
                "numberOfBookableSeats": 4,
                "itineraries": [{
                    "duration": "PT7H10M",
                    "segments": [{
                        "departure": { "iataCode": "JFK", "at": "2025-06-01T18:00:00" },
                        "arrival": { "iataCode": "LHR", "at": "2025-06-02T06:10:00" },
                        "carrierCode": "BA",
                        "number": "178",
                        "aircraft": { "code": "77W" }
                    }]
                }],
                "price": { "currency": "USD", "total": "4210.00" },
                "validatingAirlineCodes": ["BA"]
            },
            { "id": "2", "itineraries": "not-a-list" }
        ],
        "dictionaries": { "carriers": { "BA": "BRITISH AIRWAYS" } }
    })
}

async fn token(State(upstream): State<Upstream>, Form(form): Form<HashMap<String, String>>) -> Response {
    upstream.token_calls.fetch_add(1, Ordering::SeqCst);

    if upstream.token_unavailable {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_id").map(String::as_str) == Some("test-id")
        && form.get("client_secret").map(String::as_str) == Some("test-secret");
    if upstream.reject_credentials || !valid {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client", "error_description": "Client credentials are invalid" })),
        )
            .into_response();
    }

    Json(json!({
        "type": "amadeusOAuth2Token",
        "access_token": "stub-token",
        "token_type": "Bearer",
        "expires_in": 1799,
        "state": "approved"
    }))
    .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer stub-token")
}

fn search_outcome(upstream: &Upstream, headers: &HeaderMap) -> Option<Response> {
    upstream.search_calls.fetch_add(1, Ordering::SeqCst);

    if !authorized(headers) {
        return Some(StatusCode::UNAUTHORIZED.into_response());
    }
    if upstream.reject_search {
        let errors = json!({ "errors": [{ "status": 400, "code": 425, "title": "INVALID DATE", "detail": "Date is in the past" }] });
        return Some((StatusCode::BAD_REQUEST, Json(errors)).into_response());
    }
    let remaining = upstream.failures_left.load(Ordering::SeqCst);
    if remaining > 0 {
        upstream.failures_left.store(remaining - 1, Ordering::SeqCst);
        return Some((StatusCode::SERVICE_UNAVAILABLE, "try again later").into_response());
    }
    None
}

async fn search_get(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    *upstream.last_query.lock().unwrap() = query;
    search_outcome(&upstream, &headers).unwrap_or_else(|| Json(offers_body()).into_response())
}

async fn search_post(State(upstream): State<Upstream>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if headers.get("x-http-method-override").and_then(|v| v.to_str().ok()) != Some("GET") {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    *upstream.last_body.lock().unwrap() = Some(body);
    search_outcome(&upstream, &headers).unwrap_or_else(|| Json(offers_body()).into_response())
}

async fn airlines(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let data: Vec<Value> = query
        .get("airlineCodes")
        .map(|codes| codes.split(',').collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .map(|code| json!({ "type": "airline", "iataCode": code, "businessName": format!("{} AIRWAYS", code) }))
        .collect();
    Json(json!({ "data": data })).into_response()
}

async fn aircraft(headers: HeaderMap, Path(code): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if code != "359" {
        let errors = json!({ "errors": [{ "status": 404, "code": 1797, "title": "NOT FOUND" }] });
        return (StatusCode::NOT_FOUND, Json(errors)).into_response();
    }
    Json(json!({ "data": { "type": "aircraft", "iataCode": "359", "name": "AIRBUS A350-900" } })).into_response()
}

async fn pricing(State(upstream): State<Upstream>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *upstream.last_body.lock().unwrap() = Some(body.clone());
    Json(json!({
        "data": {
            "type": "flight-offers-pricing",
            "flightOffers": body["data"]["flightOffers"].clone(),
            "bookingRequirements": { "emailAddressRequired": true }
        },
        "dictionaries": { "carriers": { "BA": "BRITISH AIRWAYS" } }
    }))
    .into_response()
}

async fn spawn_upstream(upstream: Upstream) -> String {
    let router = Router::new()
        .route("/v1/security/oauth2/token", post(token))
        .route("/v2/shopping/flight-offers", get(search_get).post(search_post))
        .route("/v1/shopping/flight-offers/pricing", post(pricing))
        .route("/v1/reference-data/airlines", get(airlines))
        .route("/v1/reference-data/aircraft/{code}", get(aircraft))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn client_for(upstream: &Upstream) -> AmadeusClient {
    let endpoint = spawn_upstream(upstream.clone()).await;
    let config = AmadeusConfig {
        client_id: Some("test-id".to_string()),
        client_secret: Some("test-secret".to_string()),
        endpoint,
        timeout_seconds: 5,
    };
    let retry = RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
    };
    AmadeusClient::new(&config, retry).unwrap()
}

fn jfk_lhr() -> SearchParams {
    let mut params = SearchParams::new("JFK", "LHR", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 2);
    params.travel_class = Some(TravelClass::Business);
    params.non_stop = Some(true);
    params.max_results = 10;
    params
}

#[tokio::test]
async fn test_search_reuses_cached_token() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    let first = client.search_offers(&jfk_lhr()).await.unwrap();
    client.search_offers(&jfk_lhr()).await.unwrap();

    assert_eq!(upstream.token_calls(), 1);
    assert_eq!(upstream.search_calls(), 2);
    assert_eq!(first.data.len(), 1);
    assert_eq!(first.skipped, 1);
    assert_eq!(first.dictionaries.carriers["BA"], "BRITISH AIRWAYS");

    let status = client.status().await;
    assert!(status.is_configured());
    assert!(status.has_active_token);
}

#[tokio::test]
async fn test_search_forwards_query_parameters() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    client.search_offers(&jfk_lhr()).await.unwrap();

    let query = upstream.last_query.lock().unwrap().clone();
    assert_eq!(query["originLocationCode"], "JFK");
    assert_eq!(query["destinationLocationCode"], "LHR");
    assert_eq!(query["departureDate"], "2025-06-01");
    assert_eq!(query["adults"], "2");
    assert_eq!(query["travelClass"], "BUSINESS");
    assert_eq!(query["nonStop"], "true");
    assert_eq!(query["max"], "10");
    assert!(!query.contains_key("returnDate"));
}

#[tokio::test]
async fn test_search_forwards_traveler_mix_and_price_filters() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    let mut params = jfk_lhr();
    params.children = 1;
    params.infants = 1;
    params.currency_code = Some("EUR".to_string());
    params.max_price = Some(5000);
    client.search_offers(&params).await.unwrap();

    let query = upstream.last_query.lock().unwrap().clone();
    assert_eq!(query["children"], "1");
    assert_eq!(query["infants"], "1");
    assert_eq!(query["currencyCode"], "EUR");
    assert_eq!(query["maxPrice"], "5000");
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let upstream = Upstream {
        failures_left: Arc::new(AtomicUsize::new(2)),
        ..Upstream::default()
    };
    let client = client_for(&upstream).await;

    let response = client.search_offers(&jfk_lhr()).await.unwrap();
    assert_eq!(response.data.len(), 1);
    assert_eq!(upstream.search_calls(), 3);
    assert_eq!(upstream.token_calls(), 1);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let upstream = Upstream {
        failures_left: Arc::new(AtomicUsize::new(10)),
        ..Upstream::default()
    };
    let client = client_for(&upstream).await;

    match client.search_offers(&jfk_lhr()).await {
        Err(SupplierError::Upstream { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "try again later");
        }
        other => panic!("expected upstream error, got {:?}", other.map(|r| r.data.len())),
    }
    assert_eq!(upstream.search_calls(), 3);
}

#[tokio::test]
async fn test_provider_errors_are_folded_into_message() {
    let upstream = Upstream {
        reject_search: true,
        ..Upstream::default()
    };
    let client = client_for(&upstream).await;

    match client.search_offers(&jfk_lhr()).await {
        Err(SupplierError::Upstream { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "[425] INVALID DATE: Date is in the past");
        }
        other => panic!("expected upstream error, got {:?}", other.map(|r| r.data.len())),
    }
    // Client errors are not retried
    assert_eq!(upstream.search_calls(), 1);
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_authentication_error() {
    let upstream = Upstream {
        reject_credentials: true,
        ..Upstream::default()
    };
    let client = client_for(&upstream).await;

    match client.check_connection().await {
        Err(SupplierError::Authentication { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Client credentials are invalid");
        }
        other => panic!("expected authentication error, got {:?}", other),
    }
    assert_eq!(upstream.search_calls(), 0);
    assert!(!client.status().await.has_active_token);
}

#[tokio::test]
async fn test_token_outage_respects_attempt_limit() {
    let upstream = Upstream {
        token_unavailable: true,
        ..Upstream::default()
    };
    let client = client_for(&upstream).await;

    match client.search_offers(&jfk_lhr()).await {
        Err(SupplierError::Authentication { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected authentication error, got {:?}", other.map(|r| r.data.len())),
    }
    // Bounded by max_attempts, not max_attempts squared
    assert_eq!(upstream.token_calls(), 3);
    assert_eq!(upstream.search_calls(), 0);
}

#[tokio::test]
async fn test_post_search_sends_override_header_and_body() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    let mut params = jfk_lhr();
    params.return_date = NaiveDate::from_ymd_opt(2025, 6, 10);
    let request: FlightOffersPostRequest = params.to_post_request();

    let response = client.search_offers_post(&request).await.unwrap();
    assert_eq!(response.data.len(), 1);

    let body = upstream.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["originDestinations"].as_array().unwrap().len(), 2);
    assert_eq!(body["originDestinations"][1]["originLocationCode"], "LHR");
    assert_eq!(body["travelers"].as_array().unwrap().len(), 2);
    assert_eq!(body["sources"], json!(["GDS"]));
}

#[tokio::test]
async fn test_airline_lookup() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    let records = client
        .airlines(&["LH".to_string(), "QR".to_string()])
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].iata_code.as_deref(), Some("LH"));
    assert_eq!(records[1].business_name.as_deref(), Some("QR AIRWAYS"));

    assert!(client.airlines(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_aircraft_lookup_passes_provider_body_through() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    let body = client.aircraft("359").await.unwrap();
    assert_eq!(body["data"]["name"], "AIRBUS A350-900");

    match client.aircraft("ZZZ").await {
        Err(SupplierError::Upstream { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "[1797] NOT FOUND");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pricing_wraps_offers_and_decodes_reply() {
    let upstream = Upstream::default();
    let client = client_for(&upstream).await;

    let offer = offers_body()["data"][0].clone();
    let request = FlightOffersPricingRequest::new(vec![offer.clone()]);
    let response = client.price_offers(&request).await.unwrap();

    let body = upstream.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["data"]["type"], "flight-offers-pricing");
    assert_eq!(body["data"]["flightOffers"][0], offer);

    assert_eq!(response.data.flight_offers.len(), 1);
    assert_eq!(response.data.flight_offers[0].id, "1");
    assert_eq!(
        response.data.booking_requirements,
        Some(json!({ "emailAddressRequired": true }))
    );
    assert_eq!(upstream.token_calls(), 1);
}
