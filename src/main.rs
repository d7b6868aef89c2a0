mod api;
mod models;
mod pipeline;
mod sites;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pipeline::{BrowserFetcher, Fetch, HttpFetcher};
use sites::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚗 Car Scout - car listing scraper API");
    info!("======================================");

    let catalog = Catalog::new().context("failed to build the site catalog")?;
    info!("Supported sites: {}", catalog.supported().join(", "));

    let fetcher: Box<dyn Fetch> = if env::var("CAR_SCOUT_BROWSER").as_deref() == Ok("1") {
        info!("Using the headless browser fetcher");
        Box::new(BrowserFetcher::new()?)
    } else {
        Box::new(HttpFetcher::new()?)
    };

    let state = Arc::new(api::AppState { catalog, fetcher });

    let addr = env::var("CAR_SCOUT_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("📍 API available at: http://{addr}");
    axum::serve(listener, api::router(state))
        .await
        .context("server error")?;

    Ok(())
}
