//! One pass over the roster, summary JSON on stdout. Suited to cron-style triggers.
//!
//! Usage: `track_once [--backfill]`

use epl_sentiment_tracker::config::AppConfig;
use epl_sentiment_tracker::RunMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = if std::env::args().skip(1).any(|a| a == "--backfill") {
        RunMode::Backfill
    } else {
        RunMode::Current
    };

    let cfg = AppConfig::from_env();
    let tracker = epl_sentiment_tracker::build_tracker(&cfg)?;
    let summary = tracker.run(mode).await;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
