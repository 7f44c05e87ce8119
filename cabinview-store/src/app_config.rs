use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_AMADEUS_ENDPOINT: &str = "https://test.api.amadeus.com";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub amadeus: AmadeusConfig,
    pub retry: RetryConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct AmadeusConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default)]
    pub include_cabin_specs: bool,
}

/// Client id and secret for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

// Secrets stay out of logs
impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &"***")
            .field("client_secret", &"***")
            .finish()
    }
}

impl fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmadeusConfig")
            .field("has_client_id", &self.has_client_id())
            .field("has_client_secret", &self.has_client_secret())
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// An environment variable's value, with unset and blank treated alike.
fn non_blank_env(key: &str) -> Option<String> {
    non_blank(env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AmadeusConfig {
    pub fn has_client_id(&self) -> bool {
        present(&self.client_id).is_some()
    }

    pub fn has_client_secret(&self) -> bool {
        present(&self.client_secret).is_some()
    }

    /// Both halves of the credential pair, or `None` if either is missing or blank.
    pub fn credentials(&self) -> Option<ClientCredentials> {
        Some(ClientCredentials {
            client_id: present(&self.client_id)?.to_string(),
            client_secret: present(&self.client_secret)?.to_string(),
        })
    }

    /// Endpoint without a trailing slash, so paths can be appended directly.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            endpoint: DEFAULT_AMADEUS_ENDPOINT.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2_000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.port", 3000)?
            .set_default("amadeus.endpoint", DEFAULT_AMADEUS_ENDPOINT)?
            .set_default("amadeus.timeout_seconds", 30)?
            .set_default("retry.max_attempts", 3)?
            .set_default("retry.initial_backoff_ms", 200)?
            .set_default("retry.max_backoff_ms", 2_000)?
            .set_default("search.include_cabin_specs", false)?
            .add_source(config::File::with_name("config/default").required(false))
            // Optional per-environment overrides, development by default
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `CABINVIEW__SERVER__PORT=8080` sets `server.port`
            .add_source(config::Environment::with_prefix("CABINVIEW").separator("__"))
            // The provider's own variable names win over everything else
            .set_override_option("amadeus.client_id", non_blank_env("AMADEUS_CLIENT_ID"))?
            .set_override_option("amadeus.client_secret", non_blank_env("AMADEUS_CLIENT_SECRET"))?
            .set_override_option("amadeus.endpoint", non_blank_env("AMADEUS_API_ENDPOINT"))?
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amadeus(id: Option<&str>, secret: Option<&str>) -> AmadeusConfig {
        AmadeusConfig {
            client_id: id.map(str::to_string),
            client_secret: secret.map(str::to_string),
            ..AmadeusConfig::default()
        }
    }

    #[test]
    fn test_blank_credentials_count_as_missing() {
        assert!(amadeus(None, None).credentials().is_none());
        assert!(amadeus(Some("id"), None).credentials().is_none());
        assert!(amadeus(Some("id"), Some("   ")).credentials().is_none());
        assert!(!amadeus(Some(""), Some("secret")).has_client_id());

        let creds = amadeus(Some(" id "), Some("secret")).credentials().unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config = amadeus(Some("my-client"), Some("hunter2"));
        let rendered = format!("{:?} {:?}", config, config.credentials().unwrap());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("my-client"));
    }

    #[test]
    fn test_blank_environment_values_are_ignored() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(
            non_blank(Some(" https://api.amadeus.com ".to_string())).as_deref(),
            Some("https://api.amadeus.com")
        );
    }

    #[test]
    fn test_blank_endpoint_keeps_default() {
        std::env::set_var("AMADEUS_API_ENDPOINT", "");
        let config = Config::load().unwrap();
        std::env::remove_var("AMADEUS_API_ENDPOINT");
        assert_eq!(config.amadeus.endpoint, DEFAULT_AMADEUS_ENDPOINT);
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = AmadeusConfig {
            endpoint: "https://api.amadeus.com/".to_string(),
            ..AmadeusConfig::default()
        };
        assert_eq!(config.base_url(), "https://api.amadeus.com");
        assert_eq!(AmadeusConfig::default().timeout(), Duration::from_secs(30));
    }
}
