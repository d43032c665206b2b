//! Headless OSINT observer — binary entrypoint.
//! Preloads every window, selects the default one, and keeps the view
//! fresh on a fixed interval, logging what a UI would render.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use osint_observer::{
    HttpFeedClient, LogSink, ObserverConfig, ObserverController, SinkSet, WindowCache, WindowSize,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ObserverConfig::load()?;
    info!(base_url = %cfg.base_url, country = ?cfg.country, "starting observer");

    let client = Arc::new(HttpFeedClient::new(
        cfg.base_url.clone(),
        cfg.country.clone(),
        cfg.neutral_importance,
    ));
    let cache = Arc::new(WindowCache::new(client));
    let sinks = SinkSet {
        map: Some(Arc::new(LogSink::new("map"))),
        feed: Some(Arc::new(LogSink::new("feed"))),
    };
    let controller =
        ObserverController::new(cache, sinks, Duration::from_millis(cfg.debounce_ms));

    // Hide first-interaction latency; failures retry lazily on access.
    controller.preload().await;
    controller.set_window(WindowSize::Day).await?;

    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.refresh_secs));
    ticker.tick().await; // first tick is immediate
    loop {
        ticker.tick().await;
        if let Err(e) = controller.refresh().await {
            tracing::warn!(error = ?e, "periodic refresh failed");
        }
    }
}
