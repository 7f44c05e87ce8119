use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use cabinview_api::{app, AppState};
use cabinview_offer::OfferTransformer;
use cabinview_store::{AmadeusClient, Config, RetryPolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside local development
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cabinview_api=debug,cabinview_store=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting CabinView API on port {}", config.server.port);
    tracing::info!(
        "Amadeus endpoint {} (client id: {}, client secret: {})",
        config.amadeus.base_url(),
        if config.amadeus.has_client_id() { "set" } else { "missing" },
        if config.amadeus.has_client_secret() { "set" } else { "missing" },
    );

    let supplier = AmadeusClient::new(&config.amadeus, RetryPolicy::from(config.retry.clone()))
        .context("Failed to build Amadeus client")?;
    let transformer = OfferTransformer::new().with_cabin_specs(config.search.include_cabin_specs);

    let app = app(AppState::new(Arc::new(supplier), transformer));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
