use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cabinview_core::{CoreError, SupplierError};
use serde_json::json;

pub const CREDENTIALS_HINT: &str =
    "Set AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET in the environment or a .env file";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("Amadeus API error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) | AppError::Upstream { .. } | AppError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Configuration(msg) => {
                tracing::warn!("Upstream not configured: {}", msg);
                json!({ "error": msg, "hint": CREDENTIALS_HINT })
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                json!({ "error": "Internal Server Error" })
            }
            AppError::Validation(msg) => json!({ "error": msg }),
            other => {
                tracing::error!("Upstream failure: {}", other);
                json!({ "error": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<SupplierError> for AppError {
    fn from(err: SupplierError) -> Self {
        match err {
            SupplierError::NotConfigured(_) => AppError::Configuration(err.to_string()),
            SupplierError::Authentication { .. } => AppError::Authentication(err.to_string()),
            SupplierError::Upstream { status, message } => AppError::Upstream { status, message },
            SupplierError::Timeout(_) => AppError::Timeout(err.to_string()),
            SupplierError::Transport(_) | SupplierError::Decode(_) => AppError::Transport(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::Validation(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_supplier_errors_map_to_gateway_statuses() {
        assert_eq!(
            status_of(SupplierError::NotConfigured("missing".into()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(SupplierError::Authentication { status: 401, message: "bad".into() }.into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(SupplierError::Upstream { status: 500, message: "boom".into() }.into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(SupplierError::Timeout("30s".into()).into()), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status_of(SupplierError::Decode("eof".into()).into()), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_message_keeps_provider_status() {
        let err: AppError = SupplierError::Upstream { status: 400, message: "[425] INVALID DATE".into() }.into();
        assert_eq!(err.to_string(), "Amadeus API error: 400 - [425] INVALID DATE");
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err: AppError = CoreError::ValidationError("Missing required parameters: origin".into()).into();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
