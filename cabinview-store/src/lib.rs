pub mod amadeus_client;
pub mod app_config;
pub mod retry;
pub mod token;

pub use amadeus_client::AmadeusClient;
pub use app_config::{AmadeusConfig, ClientCredentials, Config};
pub use retry::RetryPolicy;
pub use token::{Credential, TokenCache, TokenExchange, TokenManager};
