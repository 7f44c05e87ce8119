use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::amadeus::{
    AirlineRecord, FlightOffersPostRequest, FlightOffersPricingRequest, FlightOffersPricingResponse,
    FlightOffersResponse,
};
use crate::search::SearchParams;

/// Upstream flight-data provider as seen by the HTTP layer.
#[async_trait]
pub trait FlightSupplier: Send + Sync {
    /// Simple search via query parameters
    async fn search_offers(&self, params: &SearchParams) -> Result<FlightOffersResponse, SupplierError>;

    /// Advanced search with a structured body
    async fn search_offers_post(
        &self,
        request: &FlightOffersPostRequest,
    ) -> Result<FlightOffersResponse, SupplierError>;

    /// Airline reference data for the given IATA carrier codes
    async fn airlines(&self, codes: &[String]) -> Result<Vec<AirlineRecord>, SupplierError>;

    /// Aircraft reference data for an IATA equipment code, as the provider returns it
    async fn aircraft(&self, code: &str) -> Result<serde_json::Value, SupplierError>;

    /// Confirms the current price of offers taken from a search
    async fn price_offers(
        &self,
        request: &FlightOffersPricingRequest,
    ) -> Result<FlightOffersPricingResponse, SupplierError>;

    /// Verifies credentials by obtaining a token
    async fn check_connection(&self) -> Result<(), SupplierError>;

    /// Configuration and token state, secrets masked
    async fn status(&self) -> SupplierStatus;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStatus {
    pub endpoint: String,
    pub has_client_id: bool,
    pub has_client_secret: bool,
    pub has_active_token: bool,
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl SupplierStatus {
    pub fn is_configured(&self) -> bool {
        self.has_client_id && self.has_client_secret
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SupplierError {
    #[error("Amadeus API credentials not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to get access token: {status}. {message}")]
    Authentication { status: u16, message: String },

    #[error("Upstream request failed: {status}. {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Invalid upstream response: {0}")]
    Decode(String),
}

impl SupplierError {
    /// Transient failures worth another attempt. Client errors never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            SupplierError::Timeout(_) | SupplierError::Transport(_) => true,
            SupplierError::Upstream { status, .. } | SupplierError::Authentication { status, .. } => {
                *status == 429 || *status >= 500
            }
            SupplierError::NotConfigured(_) | SupplierError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(SupplierError::Timeout("30s".into()).is_retryable());
        assert!(SupplierError::Upstream { status: 503, message: String::new() }.is_retryable());
        assert!(SupplierError::Upstream { status: 429, message: String::new() }.is_retryable());
        assert!(!SupplierError::Upstream { status: 400, message: String::new() }.is_retryable());
        assert!(!SupplierError::Authentication { status: 401, message: String::new() }.is_retryable());
        assert!(!SupplierError::NotConfigured("missing".into()).is_retryable());
    }
}
