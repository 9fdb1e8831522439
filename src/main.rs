//! Premier League sentiment tracker: binary entrypoint.
//! Boots the Axum HTTP server: pipeline triggers, dashboard read API and `/metrics`.

use std::sync::Arc;

use epl_sentiment_tracker::api::{create_router, AppState};
use epl_sentiment_tracker::config::AppConfig;
use epl_sentiment_tracker::metrics::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - TRACKER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("TRACKER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pipeline=info,ingest=info,nlp=info,store=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = AppConfig::from_env();
    let tracker = epl_sentiment_tracker::build_tracker(&cfg)?;

    let metrics = Metrics::init(tracker.roster().len()).unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "prometheus recorder unavailable; /metrics will be empty");
        Metrics::detached()
    });

    let router = create_router(AppState::new(Arc::new(tracker))).merge(metrics.router());

    Ok(router.into())
}
