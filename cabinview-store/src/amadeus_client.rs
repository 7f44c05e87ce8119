use std::sync::Arc;

use async_trait::async_trait;
use cabinview_core::amadeus::{
    AirlineRecord, AirlinesResponse, ErrorResponse, FlightOffersPostRequest, FlightOffersPricingRequest,
    FlightOffersPricingResponse,
};
use cabinview_core::{FlightOffersResponse, FlightSupplier, SearchParams, SupplierError, SupplierStatus};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::app_config::AmadeusConfig;
use crate::retry::RetryPolicy;
use crate::token::{HttpTokenExchange, TokenCache, TokenManager};

pub const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
pub const AIRLINES_PATH: &str = "/v1/reference-data/airlines";
pub const AIRCRAFT_PATH: &str = "/v1/reference-data/aircraft";
pub const PRICING_PATH: &str = "/v1/shopping/flight-offers/pricing";

// Longest slice of a non-JSON error body carried into an error message
const MAX_ERROR_BODY: usize = 200;

/// [`FlightSupplier`] backed by the Amadeus Self-Service REST API.
pub struct AmadeusClient {
    http: Client,
    base_url: String,
    tokens: TokenManager,
    retry: RetryPolicy,
    has_client_id: bool,
    has_client_secret: bool,
}

impl AmadeusClient {
    pub fn new(config: &AmadeusConfig, retry: RetryPolicy) -> Result<Self, SupplierError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("cabinview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_transport_error)?;

        let base_url = config.base_url().to_string();
        let exchange = Arc::new(HttpTokenExchange::new(http.clone(), &base_url, retry.clone()));
        let tokens = TokenManager::new(exchange, config.credentials(), Arc::new(TokenCache::new()));

        if !tokens.is_configured() {
            tracing::warn!("Amadeus credentials are not configured; searches will fail until they are set");
        }

        Ok(Self {
            http,
            base_url,
            tokens,
            retry,
            has_client_id: config.has_client_id(),
            has_client_secret: config.has_client_secret(),
        })
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Sends an authenticated request, retrying transient failures.
    ///
    /// The token is fetched once, outside the retry loop: the token exchange
    /// carries its own retry, and nesting the two would multiply attempts.
    async fn execute<F>(&self, operation: &str, build: F) -> Result<Value, SupplierError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.tokens.token().await?;
        let token = token.as_str();
        let build = &build;
        self.retry
            .run(operation, || async move {
                let response = build(&self.http)
                    .bearer_auth(token)
                    .send()
                    .await
                    .map_err(map_transport_error)?;

                let status = response.status();
                if status == StatusCode::UNAUTHORIZED {
                    // Token revoked or expired early; the next call re-authenticates
                    self.tokens.invalidate().await;
                }
                if !status.is_success() {
                    return Err(SupplierError::Upstream {
                        status: status.as_u16(),
                        message: fold_error_response(response).await,
                    });
                }

                response
                    .json::<Value>()
                    .await
                    .map_err(|e| SupplierError::Decode(e.to_string()))
            })
            .await
    }

    fn decode_offers(body: Value) -> Result<FlightOffersResponse, SupplierError> {
        let response = FlightOffersResponse::from_value(body).map_err(|e| SupplierError::Decode(e.to_string()))?;
        tracing::info!(
            "Received {} flight offers ({} dropped as malformed)",
            response.data.len(),
            response.skipped
        );
        Ok(response)
    }
}

#[async_trait]
impl FlightSupplier for AmadeusClient {
    async fn search_offers(&self, params: &SearchParams) -> Result<FlightOffersResponse, SupplierError> {
        let url = format!("{}{}", self.base_url, FLIGHT_OFFERS_PATH);
        let query = params.to_query_pairs();
        tracing::debug!("Searching {} -> {} on {}", params.origin, params.destination, params.departure_date);

        let body = self
            .execute("Flight offers search", |http| http.get(&url).query(&query))
            .await?;
        Self::decode_offers(body)
    }

    async fn search_offers_post(
        &self,
        request: &FlightOffersPostRequest,
    ) -> Result<FlightOffersResponse, SupplierError> {
        let url = format!("{}{}", self.base_url, FLIGHT_OFFERS_PATH);

        let body = self
            .execute("Flight offers search (POST)", |http| {
                http.post(&url)
                    .header("X-HTTP-Method-Override", "GET")
                    .json(request)
            })
            .await?;
        Self::decode_offers(body)
    }

    async fn airlines(&self, codes: &[String]) -> Result<Vec<AirlineRecord>, SupplierError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}{}", self.base_url, AIRLINES_PATH);
        let joined = codes.join(",");
        let body = self
            .execute("Airline lookup", |http| http.get(&url).query(&[("airlineCodes", joined.as_str())]))
            .await?;

        let response: AirlinesResponse =
            serde_json::from_value(body).map_err(|e| SupplierError::Decode(e.to_string()))?;
        Ok(response.data)
    }

    async fn aircraft(&self, code: &str) -> Result<Value, SupplierError> {
        let url = format!("{}{}/{}", self.base_url, AIRCRAFT_PATH, code);
        self.execute("Aircraft lookup", |http| http.get(&url)).await
    }

    async fn price_offers(
        &self,
        request: &FlightOffersPricingRequest,
    ) -> Result<FlightOffersPricingResponse, SupplierError> {
        let url = format!("{}{}", self.base_url, PRICING_PATH);
        let body = self
            .execute("Flight offers pricing", |http| http.post(&url).json(request))
            .await?;

        let response: FlightOffersPricingResponse =
            serde_json::from_value(body).map_err(|e| SupplierError::Decode(e.to_string()))?;
        tracing::info!("Priced {} flight offers", response.data.flight_offers.len());
        Ok(response)
    }

    async fn check_connection(&self) -> Result<(), SupplierError> {
        self.tokens.token().await.map(|_| ())
    }

    async fn status(&self) -> SupplierStatus {
        let token_expires_at = self.tokens.active_until().await;
        SupplierStatus {
            endpoint: self.base_url.clone(),
            has_client_id: self.has_client_id,
            has_client_secret: self.has_client_secret,
            has_active_token: token_expires_at.is_some(),
            token_expires_at,
        }
    }
}

pub(crate) fn map_transport_error(e: reqwest::Error) -> SupplierError {
    if e.is_timeout() {
        SupplierError::Timeout(e.to_string())
    } else {
        SupplierError::Transport(e.to_string())
    }
}

/// Reads a failed response into one line: the provider's `errors` list when
/// present, otherwise the start of the raw body or the status reason.
pub(crate) async fn fold_error_response(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    fold_error_body(status, &body)
}

fn fold_error_body(status: StatusCode, body: &str) -> String {
    if let Some(summary) = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.summary())
    {
        return summary;
    }

    // OAuth errors use their own shape
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let description = value.get("error_description").and_then(Value::as_str);
        if let Some(text) = description.or_else(|| value.get("error").and_then(Value::as_str)) {
            return text.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status.canonical_reason().unwrap_or("Unknown error").to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
