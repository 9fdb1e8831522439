//! # Snapshots
//! The persisted per-club record and the two ways of stamping it:
//! - `RunMode::Current`: one record at run time.
//! - `RunMode::Backfill`: one record per whole hour from today's UTC midnight
//!   through the current hour, each nudged by a uniform ±`BACKFILL_JITTER`.

use chrono::{DateTime, Duration, DurationRound, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::aggregate::{round3, ClubAggregate, KeyTopic};
use crate::teams::LEAGUE;

pub const DATA_TYPE: &str = "News Sentiment";
pub const BACKFILL_JITTER: f64 = 0.03;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Current,
    Backfill,
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "backfill" => Ok(Self::Backfill),
            other => anyhow::bail!("unknown run mode: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub team: String,
    pub avg_sentiment: f64,
    pub article_count: usize,
    pub sources: Vec<String>,
    pub key_topics: Vec<KeyTopic>,
    pub timestamp: DateTime<Utc>,
    pub league: String,
    pub data_type: String,
}

impl SentimentSnapshot {
    pub fn from_aggregate(team: &str, agg: &ClubAggregate, timestamp: DateTime<Utc>) -> Self {
        Self {
            team: team.to_string(),
            avg_sentiment: agg.avg_sentiment,
            article_count: agg.article_count,
            sources: agg.sources.iter().cloned().collect(),
            key_topics: agg.key_topics.clone(),
            timestamp,
            league: LEAGUE.to_string(),
            data_type: DATA_TYPE.to_string(),
        }
    }
}

/// Coarse label used in logs and the dashboard: above 0.1 positive, below -0.1 negative.
pub fn sentiment_label(score: f64) -> &'static str {
    if score > 0.1 {
        "POSITIVE"
    } else if score < -0.1 {
        "NEGATIVE"
    } else {
        "NEUTRAL"
    }
}

/// UTC midnight of `now`'s day.
pub fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

/// Lower date bound handed to feeds in backfill mode.
pub fn backfill_since(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Whole hours from midnight through the hour containing `now`, inclusive.
pub fn hour_marks(now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let current = now
        .duration_trunc(Duration::hours(1))
        .unwrap_or_else(|_| day_start(now));
    let mut out = Vec::with_capacity(24);
    let mut t = day_start(now);
    while t <= current {
        out.push(t);
        t += Duration::hours(1);
    }
    out
}

pub fn build_current(team: &str, agg: &ClubAggregate, now: DateTime<Utc>) -> Vec<SentimentSnapshot> {
    vec![SentimentSnapshot::from_aggregate(team, agg, now)]
}

/// One jittered copy of the aggregate per hour mark.
pub fn build_backfill<R: Rng>(
    team: &str,
    agg: &ClubAggregate,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<SentimentSnapshot> {
    hour_marks(now)
        .into_iter()
        .map(|ts| {
            let mut s = SentimentSnapshot::from_aggregate(team, agg, ts);
            let jitter = rng.random_range(-BACKFILL_JITTER..=BACKFILL_JITTER);
            s.avg_sentiment = round3((agg.avg_sentiment + jitter).clamp(-1.0, 1.0));
            s
        })
        .collect()
}
