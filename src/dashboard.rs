//! # Dashboard read model
//! Pure views over a window of stored snapshots: rankings, overview, trends,
//! topics, source breakdown and a plain-text summary report.
//!
//! The sentiment filter is applied to the whole window before any view is
//! derived, so every view sees the same rows.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use crate::aggregate::{round3, KeyTopic};
use crate::snapshot::{sentiment_label, SentimentSnapshot};
use crate::store::{SnapshotStore, MAX_QUERY_ROWS};
use crate::teams::LEAGUE;

pub const DEFAULT_WINDOW_DAYS: i64 = 14;
pub const MAX_WINDOW_DAYS: i64 = 30;
/// Teams shown by trends and the report when none are requested.
pub const DEFAULT_SELECTED_TEAMS: usize = 6;
pub const TOP_CLUBS_BY_ARTICLES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SentimentFilter {
    #[default]
    All,
    Positive,
    Negative,
    Neutral,
}

impl FromStr for SentimentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(SentimentFilter::All),
            "positive" => Ok(SentimentFilter::Positive),
            "negative" => Ok(SentimentFilter::Negative),
            "neutral" => Ok(SentimentFilter::Neutral),
            other => Err(format!("unknown sentiment filter `{other}`")),
        }
    }
}

impl TryFrom<String> for SentimentFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl SentimentFilter {
    pub fn matches(self, score: f64) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Positive => score > 0.0,
            SentimentFilter::Negative => score < 0.0,
            SentimentFilter::Neutral => (-0.1..=0.1).contains(&score),
        }
    }
}

pub fn clamp_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, MAX_WINDOW_DAYS)
}

/// Snapshots newer than `now - days`, newest first, filtered.
pub fn load_window(
    store: &dyn SnapshotStore,
    days: i64,
    filter: SentimentFilter,
    now: DateTime<Utc>,
) -> Result<Vec<SentimentSnapshot>> {
    let cutoff = now - Duration::days(days);
    let rows = store.query_since(cutoff, MAX_QUERY_ROWS)?;
    Ok(rows
        .into_iter()
        .filter(|s| filter.matches(s.avg_sentiment))
        .collect())
}

/// Each club's most recent snapshot, highest sentiment first.
pub fn latest_per_club(rows: &[SentimentSnapshot]) -> Vec<&SentimentSnapshot> {
    let mut latest: HashMap<&str, &SentimentSnapshot> = HashMap::new();
    for s in rows {
        latest
            .entry(s.team.as_str())
            .and_modify(|cur| {
                if s.timestamp > cur.timestamp {
                    *cur = s;
                }
            })
            .or_insert(s);
    }
    let mut out: Vec<_> = latest.into_values().collect();
    out.sort_by(|a, b| {
        b.avg_sentiment
            .total_cmp(&a.avg_sentiment)
            .then_with(|| a.team.cmp(&b.team))
    });
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub rank: usize,
    pub team: String,
    pub sentiment: f64,
    pub label: &'static str,
    pub article_count: usize,
    pub timestamp: DateTime<Utc>,
}

pub fn rankings(rows: &[SentimentSnapshot]) -> Vec<Ranking> {
    latest_per_club(rows)
        .into_iter()
        .enumerate()
        .map(|(i, s)| Ranking {
            rank: i + 1,
            team: s.team.clone(),
            sentiment: s.avg_sentiment,
            label: sentiment_label(s.avg_sentiment),
            article_count: s.article_count,
            timestamp: s.timestamp,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore {
    pub team: String,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub teams_tracked: usize,
    pub most_positive: Option<TeamScore>,
    pub most_negative: Option<TeamScore>,
    /// Mean of each club's latest value.
    pub league_average: Option<f64>,
    /// Sum over every snapshot in the window.
    pub total_articles: usize,
}

pub fn overview(rows: &[SentimentSnapshot]) -> Overview {
    let latest = latest_per_club(rows);
    let score = |s: &&SentimentSnapshot| TeamScore {
        team: s.team.clone(),
        sentiment: s.avg_sentiment,
    };
    let league_average = if latest.is_empty() {
        None
    } else {
        Some(round3(
            latest.iter().map(|s| s.avg_sentiment).sum::<f64>() / latest.len() as f64,
        ))
    };
    Overview {
        teams_tracked: latest.len(),
        most_positive: latest.first().map(score),
        most_negative: latest.last().map(score),
        league_average,
        total_articles: rows.iter().map(|s| s.article_count).sum(),
    }
}

/// Requested teams, or the top of the rankings when the request is empty.
pub fn select_teams(rows: &[SentimentSnapshot], requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return latest_per_club(rows)
            .into_iter()
            .take(DEFAULT_SELECTED_TEAMS)
            .map(|s| s.team.clone())
            .collect();
    }
    requested.to_vec()
}

/// Comma-separated `teams=` query value.
pub fn parse_team_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Ok,
    Insufficient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTrend {
    pub team: String,
    pub status: TrendStatus,
    pub points: Vec<TrendPoint>,
}

/// Oldest-first rows for one team.
fn team_series<'a>(rows: &'a [SentimentSnapshot], team: &str) -> Vec<&'a SentimentSnapshot> {
    let mut series: Vec<_> = rows.iter().filter(|s| s.team == team).collect();
    series.sort_by_key(|s| s.timestamp);
    series
}

pub fn trends(rows: &[SentimentSnapshot], teams: &[String]) -> Vec<TeamTrend> {
    teams
        .iter()
        .map(|team| {
            let series = team_series(rows, team);
            let distinct: BTreeSet<_> = series.iter().map(|s| s.timestamp).collect();
            TeamTrend {
                team: team.clone(),
                status: if distinct.len() < 2 {
                    TrendStatus::Insufficient
                } else {
                    TrendStatus::Ok
                },
                points: series
                    .iter()
                    .map(|s| TrendPoint {
                        timestamp: s.timestamp,
                        sentiment: s.avg_sentiment,
                    })
                    .collect(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTopics {
    pub team: String,
    pub sentiment: f64,
    pub key_topics: Vec<KeyTopic>,
}

/// Key topics from each club's latest snapshot, in ranking order.
pub fn topics(rows: &[SentimentSnapshot]) -> Vec<TeamTopics> {
    latest_per_club(rows)
        .into_iter()
        .map(|s| TeamTopics {
            team: s.team.clone(),
            sentiment: s.avg_sentiment,
            key_topics: s.key_topics.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubArticles {
    pub team: String,
    pub article_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBreakdown {
    /// Source name → number of snapshots citing it.
    pub sources: BTreeMap<String, usize>,
    pub top_clubs: Vec<ClubArticles>,
}

pub fn source_breakdown(rows: &[SentimentSnapshot]) -> SourceBreakdown {
    let mut sources: BTreeMap<String, usize> = BTreeMap::new();
    let mut per_team: HashMap<&str, usize> = HashMap::new();
    for s in rows {
        for src in &s.sources {
            *sources.entry(src.clone()).or_default() += 1;
        }
        *per_team.entry(s.team.as_str()).or_default() += s.article_count;
    }
    let mut top_clubs: Vec<ClubArticles> = per_team
        .into_iter()
        .map(|(team, article_count)| ClubArticles {
            team: team.to_string(),
            article_count,
        })
        .collect();
    top_clubs.sort_by(|a, b| {
        b.article_count
            .cmp(&a.article_count)
            .then_with(|| a.team.cmp(&b.team))
    });
    top_clubs.truncate(TOP_CLUBS_BY_ARTICLES);
    SourceBreakdown { sources, top_clubs }
}

/// Report wording band for one score.
pub fn report_band(score: f64) -> (&'static str, &'static str) {
    if score > 0.15 {
        ("very positive", "strong performances, victories, and positive developments")
    } else if score > 0.05 {
        ("positive", "good form, favorable results, or promising developments")
    } else if score < -0.15 {
        (
            "very negative",
            "poor results, defensive struggles, managerial pressure, or off-field controversies",
        )
    } else if score < -0.05 {
        ("negative", "disappointing performances, losses, or tactical concerns")
    } else {
        ("neutral", "balanced coverage without strong positive or negative themes")
    }
}

fn join_topics(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn mean(xs: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = xs.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Mean of the last three minus mean of the first three; needs at least three points.
pub fn trend_delta(series: &[&SentimentSnapshot]) -> Option<f64> {
    if series.len() < 3 {
        return None;
    }
    let recent = mean(series[series.len() - 3..].iter().map(|s| s.avg_sentiment))?;
    let older = mean(series[..3].iter().map(|s| s.avg_sentiment))?;
    Some(recent - older)
}

fn trend_sentence(change: f64) -> Option<String> {
    if change > 0.1 {
        Some(format!("Media perception has improved significantly (+{change:.2}). "))
    } else if change > 0.03 {
        Some("Sentiment trending more positive recently. ".to_string())
    } else if change < -0.1 {
        Some(format!("Coverage has turned sharply more critical ({change:.2}). "))
    } else if change < -0.03 {
        Some("Media tone has worsened in recent reports. ".to_string())
    } else {
        None
    }
}

/// Plain-text (markdown) summary of the selected teams.
pub fn summary_report(rows: &[SentimentSnapshot], teams: &[String], now: DateTime<Utc>) -> String {
    let mut out = format!("**{LEAGUE} Media Sentiment Analysis**\n\n");
    out.push_str(&format!(
        "*Generated: {}*\n\n---\n\n",
        now.format("%B %d, %Y at %H:%M")
    ));

    let mut latest_scores = Vec::new();
    for team in teams {
        let series = team_series(rows, team);
        let Some(latest) = series.last() else {
            continue;
        };
        let score = latest.avg_sentiment;
        latest_scores.push(score);
        let (label, explanation) = report_band(score);

        out.push_str(&format!("### {team}\n\n"));
        let names: Vec<&str> = latest.key_topics.iter().take(3).map(|t| t.name.as_str()).collect();
        if names.is_empty() {
            out.push_str(&format!(
                "{team} shows {label} sentiment ({score:.2}), indicating {explanation}. "
            ));
        } else {
            out.push_str(&format!(
                "{team} is experiencing {label} media coverage ({score:.2}), with recent focus on {}. Coverage suggests {explanation}. ",
                join_topics(&names)
            ));
        }
        if let Some(sentence) = trend_delta(&series).and_then(trend_sentence) {
            out.push_str(&sentence);
        }
        let articles: usize = series.iter().map(|s| s.article_count).sum();
        out.push_str(&format!("Analysis based on {articles} articles.\n\n---\n\n"));
    }

    if teams.len() > 1 {
        if let Some(avg) = mean(latest_scores.into_iter()) {
            out.push_str(&format!(
                "### League Overview\n\nAverage media sentiment: {avg:.2}\n\n"
            ));
        }
    }
    out
}
