use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use cabinview_core::SupplierStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CREDENTIALS_HINT;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamStatusResponse {
    pub connected: bool,
    #[serde(flatten)]
    pub status: SupplierStatus,
    pub error: Option<String>,
    pub hint: Option<&'static str>,
    pub checked_at: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/status/upstream", get(upstream_status))
}

/// GET /api/status/upstream
/// Reports configuration and checks the provider by fetching a token.
///
/// An unconfigured service answers 200 since that is a reportable state;
/// a configured one whose token fetch fails answers 503.
pub async fn upstream_status(State(state): State<AppState>) -> (StatusCode, Json<UpstreamStatusResponse>) {
    let status = state.supplier.status().await;
    let checked_at = Utc::now();

    if !status.is_configured() {
        return (
            StatusCode::OK,
            Json(UpstreamStatusResponse {
                connected: false,
                status,
                error: Some("Amadeus API credentials not configured".to_string()),
                hint: Some(CREDENTIALS_HINT),
                checked_at,
            }),
        );
    }

    match state.supplier.check_connection().await {
        Ok(()) => (
            StatusCode::OK,
            Json(UpstreamStatusResponse {
                connected: true,
                // Re-read so the freshly issued token shows up
                status: state.supplier.status().await,
                error: None,
                hint: None,
                checked_at,
            }),
        ),
        Err(e) => {
            tracing::warn!("Upstream connectivity check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UpstreamStatusResponse {
                    connected: false,
                    status,
                    error: Some(e.to_string()),
                    hint: None,
                    checked_at,
                }),
            )
        }
    }
}
