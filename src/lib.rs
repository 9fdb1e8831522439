// src/lib.rs
// Public library surface for the server, the one-shot binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod attribution;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod nlp;
pub mod snapshot;
pub mod store;
pub mod teams;

// ---- Re-exports for stable public API ----
pub use crate::engine::{ClubOutcome, RunSummary, SkipReason, Tracker};
pub use crate::snapshot::{RunMode, SentimentSnapshot};

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::{AppConfig, NlpConfig};
use crate::store::SqliteStore;
use crate::teams::Roster;

/// Wire roster, NLP client, store and live feeds from config files and env.
/// Shared by the HTTP entrypoint and `track_once`.
pub fn build_tracker(cfg: &AppConfig) -> anyhow::Result<Tracker> {
    let roster = Roster::load_default().context("loading club roster")?;
    let nlp_cfg = NlpConfig::load_default().context("loading NLP config")?;
    let nlp = nlp::build_client(&nlp_cfg);
    let store = SqliteStore::open(&cfg.db_path)?;

    info!(
        target: "pipeline",
        clubs = roster.len(),
        nlp = nlp.name(),
        db = %cfg.db_path,
        attribution = ?cfg.attribution,
        delay_ms = cfg.politeness_delay.as_millis() as u64,
        "tracker configured"
    );

    Tracker::from_config(cfg, Arc::new(roster), nlp, Arc::new(store))
}
