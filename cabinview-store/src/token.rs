use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cabinview_core::amadeus::AccessTokenResponse;
use cabinview_core::SupplierError;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::amadeus_client::{fold_error_response, map_transport_error};
use crate::app_config::ClientCredentials;
use crate::retry::RetryPolicy;

/// Tokens are treated as expired this long before the provider says so.
pub const EXPIRY_MARGIN_MS: i64 = 60_000;

pub const TOKEN_PATH: &str = "/v1/security/oauth2/token";

// Upper bound on a grant's advertised lifetime (one day)
const MAX_GRANT_SECONDS: i64 = 86_400;

/// A bearer token and the instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn from_grant(grant: AccessTokenResponse, issued_at: DateTime<Utc>) -> Self {
        let lifetime_ms = grant.expires_in.clamp(0, MAX_GRANT_SECONDS) * 1000 - EXPIRY_MARGIN_MS;
        Self {
            token: grant.access_token,
            expires_at: issued_at + Duration::milliseconds(lifetime_ms),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Process-local home of the current credential. Never persisted.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<Credential>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached credential if it is still valid at `now`.
    pub async fn fresh(&self, now: DateTime<Utc>) -> Option<Credential> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|c| c.is_valid_at(now))
            .cloned()
    }

    pub async fn store(&self, credential: Credential) {
        *self.slot.write().await = Some(credential);
    }

    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// One client-credentials exchange against the token endpoint.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<AccessTokenResponse, SupplierError>;
}

pub struct HttpTokenExchange {
    http: Client,
    token_url: String,
    retry: RetryPolicy,
}

impl HttpTokenExchange {
    pub fn new(http: Client, base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            http,
            token_url: format!("{}{}", base_url, TOKEN_PATH),
            retry,
        }
    }

    async fn exchange_once(&self, credentials: &ClientCredentials) -> Result<AccessTokenResponse, SupplierError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = fold_error_response(response).await;
            return Err(SupplierError::Authentication {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AccessTokenResponse>()
            .await
            .map_err(|e| SupplierError::Decode(format!("token response: {}", e)))
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<AccessTokenResponse, SupplierError> {
        self.retry
            .run("Token exchange", || self.exchange_once(credentials))
            .await
    }
}

/// Hands out bearer tokens, re-authenticating only when the cached one has
/// expired.
///
/// The cache lock is never held across the exchange, so two callers that
/// both see an expired token will both re-authenticate. The last write wins.
pub struct TokenManager {
    exchange: Arc<dyn TokenExchange>,
    credentials: Option<ClientCredentials>,
    cache: Arc<TokenCache>,
}

impl TokenManager {
    pub fn new(
        exchange: Arc<dyn TokenExchange>,
        credentials: Option<ClientCredentials>,
        cache: Arc<TokenCache>,
    ) -> Self {
        Self {
            exchange,
            credentials,
            cache,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn token(&self) -> Result<String, SupplierError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            SupplierError::NotConfigured(
                "AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET must both be set".to_string(),
            )
        })?;

        if let Some(credential) = self.cache.fresh(Utc::now()).await {
            return Ok(credential.token);
        }

        tracing::debug!("Requesting new Amadeus access token");
        let grant = self.exchange.exchange(credentials).await?;
        let credential = Credential::from_grant(grant, Utc::now());
        tracing::info!("Obtained Amadeus access token, valid until {}", credential.expires_at);

        let token = credential.token.clone();
        self.cache.store(credential).await;
        Ok(token)
    }

    /// Drops the cached token, e.g. after the provider rejected it.
    pub async fn invalidate(&self) {
        self.cache.clear().await;
    }

    /// Expiry of the cached token, if one is still valid.
    pub async fn active_until(&self) -> Option<DateTime<Utc>> {
        self.cache.fresh(Utc::now()).await.map(|c| c.expires_at)
    }
}
