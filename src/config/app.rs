// src/config/app.rs
//! Process configuration read from the environment (after `dotenvy`).

use std::env;
use std::time::Duration;

use crate::attribution::AttributionPolicy;
use crate::ingest::providers::{google_news, rss_feed};

pub const ENV_DB_PATH: &str = "TRACKER_DB_PATH";
pub const ENV_POLITENESS_DELAY_MS: &str = "POLITENESS_DELAY_MS";
pub const ENV_ATTRIBUTION_POLICY: &str = "ATTRIBUTION_POLICY";
pub const ENV_GOOGLE_NEWS_BASE_URL: &str = "GOOGLE_NEWS_BASE_URL";
pub const ENV_BBC_SPORT_RSS_URL: &str = "BBC_SPORT_RSS_URL";
pub const ENV_SKY_SPORTS_RSS_URL: &str = "SKY_SPORTS_RSS_URL";

pub const DEFAULT_DB_PATH: &str = "data/team_sentiment.db";
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: String,
    /// Pause between successive feed calls for the same club.
    pub politeness_delay: Duration,
    pub attribution: AttributionPolicy,
    pub google_news_base_url: String,
    pub bbc_sport_url: String,
    pub sky_sports_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            politeness_delay: Duration::from_millis(DEFAULT_POLITENESS_DELAY_MS),
            attribution: AttributionPolicy::default(),
            google_news_base_url: google_news::DEFAULT_BASE_URL.to_string(),
            bbc_sport_url: rss_feed::BBC_SPORT_URL.to_string(),
            sky_sports_url: rss_feed::SKY_SPORTS_URL.to_string(),
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Read overrides from the environment. Unparseable values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(p) = env_nonempty(ENV_DB_PATH) {
            cfg.db_path = p;
        }
        if let Some(raw) = env_nonempty(ENV_POLITENESS_DELAY_MS) {
            match raw.parse::<u64>() {
                Ok(ms) => cfg.politeness_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %raw, "invalid {ENV_POLITENESS_DELAY_MS}; using default"),
            }
        }
        if let Some(raw) = env_nonempty(ENV_ATTRIBUTION_POLICY) {
            match raw.parse::<AttributionPolicy>() {
                Ok(p) => cfg.attribution = p,
                Err(e) => tracing::warn!(error = %e, "invalid {ENV_ATTRIBUTION_POLICY}; using default"),
            }
        }
        if let Some(u) = env_nonempty(ENV_GOOGLE_NEWS_BASE_URL) {
            cfg.google_news_base_url = u;
        }
        if let Some(u) = env_nonempty(ENV_BBC_SPORT_RSS_URL) {
            cfg.bbc_sport_url = u;
        }
        if let Some(u) = env_nonempty(ENV_SKY_SPORTS_RSS_URL) {
            cfg.sky_sports_url = u;
        }
        cfg
    }
}
