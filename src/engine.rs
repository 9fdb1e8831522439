//! # Job driver
//! Walks the roster sequentially and, for each club, runs
//! fetch → attribute → aggregate → write.
//!
//! Every club ends in an explicit [`ClubOutcome`]; nothing a single club does
//! can abort the loop. The run-level [`RunSummary`] is what the trigger
//! surface returns.

use anyhow::Result;
use futures::FutureExt;
use chrono::{DateTime, NaiveDate, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{self, ClubAggregate, KeyTopic};
use crate::attribution::{filter_articles, AttributionPolicy};
use crate::config::AppConfig;
use crate::ingest::providers::google_news::GoogleNewsProvider;
use crate::ingest::providers::http_client;
use crate::ingest::providers::rss_feed::RssFeedProvider;
use crate::ingest::fetch_or_empty;
use crate::ingest::types::{Article, ArticleProvider, FeedScope, FeedSource};
use crate::nlp::DynNlp;
use crate::snapshot::{self, sentiment_label, RunMode, SentimentSnapshot};
use crate::store::SnapshotStore;
use crate::teams::{Club, Roster};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_runs_total", "Completed pipeline runs by mode.");
        describe_counter!("snapshots_written_total", "Snapshot records appended to the store.");
        describe_counter!("pipeline_clubs_skipped_total", "Clubs that produced no snapshot.");
        describe_gauge!("pipeline_last_run_ts", "Unix time of the last completed run.");
    });
}

/// Why a club produced no snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoArticles,
    NoScoredArticles,
    StoreFailed(String),
    /// A provider, the NLP client or the store panicked mid-club.
    Panicked(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoArticles => f.write_str("no articles found"),
            SkipReason::NoScoredArticles => f.write_str("no article could be scored"),
            SkipReason::StoreFailed(e) => write!(f, "store write failed: {e}"),
            SkipReason::Panicked(msg) => write!(f, "unexpected failure: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClubResult {
    pub team: String,
    pub avg_sentiment: f64,
    pub article_count: usize,
    pub sources: BTreeSet<String>,
    pub key_topics: Vec<KeyTopic>,
    pub documents_written: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClubOutcome {
    Written(ClubResult),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSentiment {
    pub team: String,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTeam {
    pub team: String,
    pub reason: String,
}

/// Trigger response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub status: &'static str,
    pub mode: RunMode,
    pub teams_processed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_articles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_datapoints: Option<usize>,
    pub average_sentiment: f64,
    pub results: Vec<TeamSentiment>,
    pub skipped: Vec<SkippedTeam>,
}

impl RunSummary {
    fn from_outcomes(mode: RunMode, outcomes: Vec<(String, ClubOutcome)>) -> Self {
        let mut results = Vec::new();
        let mut skipped = Vec::new();
        let mut articles = 0usize;
        let mut documents = 0usize;

        for (team, outcome) in outcomes {
            match outcome {
                ClubOutcome::Written(r) => {
                    articles += r.article_count;
                    documents += r.documents_written;
                    results.push(TeamSentiment {
                        team,
                        sentiment: r.avg_sentiment,
                    });
                }
                ClubOutcome::Skipped(reason) => skipped.push(SkippedTeam {
                    team,
                    reason: reason.to_string(),
                }),
            }
        }

        let scores: Vec<f64> = results.iter().map(|r| r.sentiment).collect();
        let average_sentiment = aggregate::mean_rounded(&scores).unwrap_or(0.0);

        let (total_articles, hourly_datapoints) = match mode {
            RunMode::Current => (Some(articles), None),
            RunMode::Backfill => (None, Some(documents)),
        };

        Self {
            status: "success",
            mode,
            teams_processed: results.len(),
            total_articles,
            hourly_datapoints,
            average_sentiment,
            results,
            skipped,
        }
    }
}

/// Owns everything a run needs; cheap to share behind an `Arc`.
pub struct Tracker {
    roster: Arc<Roster>,
    providers: Vec<Box<dyn ArticleProvider>>,
    nlp: DynNlp,
    store: Arc<dyn SnapshotStore>,
    attribution: AttributionPolicy,
    politeness_delay: Duration,
    jitter_seed: Option<u64>,
    /// Serialises overlapping triggers into one job at a time.
    run_lock: tokio::sync::Mutex<()>,
}

impl Tracker {
    pub fn new(
        roster: Arc<Roster>,
        providers: Vec<Box<dyn ArticleProvider>>,
        nlp: DynNlp,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            roster,
            providers,
            nlp,
            store,
            attribution: AttributionPolicy::default(),
            politeness_delay: Duration::ZERO,
            jitter_seed: None,
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Live feeds (Google News, BBC Sport, Sky Sports) configured from `cfg`.
    pub fn from_config(
        cfg: &AppConfig,
        roster: Arc<Roster>,
        nlp: DynNlp,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self> {
        let client = http_client()?;
        let providers: Vec<Box<dyn ArticleProvider>> = vec![
            Box::new(GoogleNewsProvider::from_base_url(
                cfg.google_news_base_url.clone(),
                client.clone(),
            )),
            Box::new(RssFeedProvider::from_url(
                FeedSource::BbcSport,
                cfg.bbc_sport_url.clone(),
                client.clone(),
            )),
            Box::new(RssFeedProvider::from_url(
                FeedSource::SkySports,
                cfg.sky_sports_url.clone(),
                client,
            )),
        ];
        Ok(Self::new(roster, providers, nlp, store)
            .with_attribution(cfg.attribution)
            .with_politeness_delay(cfg.politeness_delay))
    }

    pub fn with_attribution(mut self, policy: AttributionPolicy) -> Self {
        self.attribution = policy;
        self
    }

    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Fix the backfill jitter sequence (tests, reproducible runs).
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// All sources for one club, in provider order. Shared pools are attributed;
    /// per-club sources are trusted as-is.
    pub async fn collect_articles(&self, club: &Club, since: Option<NaiveDate>) -> Vec<Article> {
        let mut out = Vec::new();
        for (i, provider) in self.providers.iter().enumerate() {
            if i > 0 && !self.politeness_delay.is_zero() {
                tokio::time::sleep(self.politeness_delay).await;
            }
            let fetched = fetch_or_empty(provider.as_ref(), club, since).await;
            let kept = match provider.scope() {
                FeedScope::PerClub => fetched,
                FeedScope::Shared => filter_articles(fetched, &club.variants, self.attribution),
            };
            tracing::debug!(
                target: "pipeline",
                club = %club.name,
                source = provider.source().as_str(),
                kept = kept.len(),
                "articles attributed"
            );
            out.extend(kept);
        }
        out
    }

    /// Append each snapshot independently; returns how many landed.
    fn write_all(&self, snapshots: &[SentimentSnapshot]) -> Result<usize> {
        let mut written = 0usize;
        let mut last_err = None;
        for s in snapshots {
            match self.store.append(s) {
                Ok(id) => {
                    written += 1;
                    counter!("snapshots_written_total").increment(1);
                    tracing::debug!(target: "store", id, team = %s.team, ts = %s.timestamp, "snapshot written");
                }
                Err(e) => {
                    tracing::warn!(target: "store", error = ?e, team = %s.team, ts = %s.timestamp, "snapshot write failed");
                    last_err = Some(e);
                }
            }
        }
        match (written, last_err) {
            (0, Some(e)) => Err(e),
            _ => Ok(written),
        }
    }

    pub async fn process_club(
        &self,
        club: &Club,
        mode: RunMode,
        now: DateTime<Utc>,
        rng: &mut StdRng,
    ) -> ClubOutcome {
        let since = match mode {
            RunMode::Current => None,
            RunMode::Backfill => Some(snapshot::backfill_since(now)),
        };

        let articles = self.collect_articles(club, since).await;
        if articles.is_empty() {
            return ClubOutcome::Skipped(SkipReason::NoArticles);
        }

        let denylist = self.roster.topic_denylist(club);
        let Some(agg) = aggregate::aggregate_club(self.nlp.as_ref(), &articles, &denylist).await
        else {
            return ClubOutcome::Skipped(SkipReason::NoScoredArticles);
        };

        let snapshots = match mode {
            RunMode::Current => snapshot::build_current(&club.name, &agg, now),
            RunMode::Backfill => snapshot::build_backfill(&club.name, &agg, now, rng),
        };

        match self.write_all(&snapshots) {
            Ok(documents_written) => ClubOutcome::Written(club_result(club, agg, documents_written)),
            Err(e) => ClubOutcome::Skipped(SkipReason::StoreFailed(format!("{e:#}"))),
        }
    }

    pub async fn run(&self, mode: RunMode) -> RunSummary {
        self.run_at(mode, Utc::now()).await
    }

    /// One full pass over the roster as of `now`.
    pub async fn run_at(&self, mode: RunMode, now: DateTime<Utc>) -> RunSummary {
        ensure_metrics_described();
        let _guard = self.run_lock.lock().await;
        let mut rng = match self.jitter_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::info!(
            target: "pipeline",
            mode = ?mode,
            clubs = self.roster.len(),
            nlp = self.nlp.name(),
            "run started"
        );

        let mut outcomes = Vec::with_capacity(self.roster.len());
        for club in self.roster.clubs() {
            let outcome = match AssertUnwindSafe(self.process_club(club, mode, now, &mut rng))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(payload) => ClubOutcome::Skipped(SkipReason::Panicked(panic_message(&*payload))),
            };
            match &outcome {
                ClubOutcome::Written(r) => tracing::info!(
                    target: "pipeline",
                    club = %club.name,
                    avg = r.avg_sentiment,
                    label = sentiment_label(r.avg_sentiment),
                    articles = r.article_count,
                    documents = r.documents_written,
                    sources = ?r.sources,
                    topics = ?r.key_topics.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
                    "club processed"
                ),
                ClubOutcome::Skipped(reason) => {
                    counter!("pipeline_clubs_skipped_total").increment(1);
                    tracing::warn!(target: "pipeline", club = %club.name, %reason, "club skipped");
                }
            }
            outcomes.push((club.name.clone(), outcome));
        }

        let summary = RunSummary::from_outcomes(mode, outcomes);
        let mode_label = match mode {
            RunMode::Current => "current",
            RunMode::Backfill => "backfill",
        };
        counter!("pipeline_runs_total", "mode" => mode_label).increment(1);
        gauge!("pipeline_last_run_ts").set(now.timestamp().max(0) as f64);

        tracing::info!(
            target: "pipeline",
            mode = mode_label,
            processed = summary.teams_processed,
            skipped = summary.skipped.len(),
            average = summary.average_sentiment,
            "run finished"
        );
        summary
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

fn club_result(club: &Club, agg: ClubAggregate, documents_written: usize) -> ClubResult {
    ClubResult {
        team: club.name.clone(),
        avg_sentiment: agg.avg_sentiment,
        article_count: agg.article_count,
        sources: agg.sources,
        key_topics: agg.key_topics,
        documents_written,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Entity, NlpClient, NlpError};
    use crate::store::SqliteStore;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// Scores looked up by exact article text; unknown text fails.
    struct ScriptedNlp {
        scores: HashMap<String, f64>,
        entities: Vec<Entity>,
    }

    #[async_trait]
    impl NlpClient for ScriptedNlp {
        async fn analyze_sentiment(&self, text: &str) -> Result<f64, NlpError> {
            self.scores
                .get(text)
                .copied()
                .ok_or_else(|| NlpError::Malformed("unscripted".into()))
        }
        async fn analyze_entities(&self, _text: &str) -> Result<Vec<Entity>, NlpError> {
            Ok(self.entities.clone())
        }
        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    struct StaticProvider {
        source: FeedSource,
        scope: FeedScope,
        texts: Vec<String>,
    }

    #[async_trait]
    impl ArticleProvider for StaticProvider {
        async fn fetch(&self, club: &Club, _since: Option<NaiveDate>) -> Result<Vec<Article>> {
            // Per-club sources only answer for the club they were built around.
            if self.scope == FeedScope::PerClub && !self.texts.iter().any(|t| t.contains(&club.name)) {
                return Ok(vec![]);
            }
            Ok(self
                .texts
                .iter()
                .map(|t| Article {
                    text: t.clone(),
                    source: self.source,
                    published: None,
                    link: None,
                })
                .collect())
        }
        fn source(&self) -> FeedSource {
            self.source
        }
        fn scope(&self) -> FeedScope {
            self.scope
        }
    }

    const LIVERPOOL_TEXTS: [&str; 5] = [
        "Liverpool cruise past Brentford with a composed display",
        "Liverpool edge a tight contest at Anfield on Saturday",
        "Liverpool concern over a late knock picked up in training",
        "Liverpool superb as Salah inspires another big away win",
        "Liverpool name an unchanged side for the midweek fixture",
    ];

    fn two_club_roster() -> Arc<Roster> {
        Arc::new(
            Roster::from_clubs(vec![
                Club::new("Liverpool", &["Liverpool", "LFC", "Reds"]),
                Club::new("Everton", &["Everton", "Toffees"]),
            ])
            .unwrap(),
        )
    }

    fn liverpool_tracker(store: Arc<dyn SnapshotStore>) -> Tracker {
        let scores = LIVERPOOL_TEXTS
            .iter()
            .zip([0.2, 0.1, -0.05, 0.3, 0.0])
            .map(|(t, s)| (t.to_string(), s))
            .collect();
        let nlp = Arc::new(ScriptedNlp {
            scores,
            entities: vec![
                Entity { name: "Liverpool".into(), kind: "ORGANIZATION".into(), salience: 0.6 },
                Entity { name: "Mohamed Salah".into(), kind: "PERSON".into(), salience: 0.2 },
            ],
        });
        let providers: Vec<Box<dyn ArticleProvider>> = vec![Box::new(StaticProvider {
            source: FeedSource::BbcSport,
            scope: FeedScope::Shared,
            texts: LIVERPOOL_TEXTS.iter().map(|s| s.to_string()).collect(),
        })];
        Tracker::new(two_club_roster(), providers, nlp, store).with_jitter_seed(42)
    }

    #[tokio::test]
    async fn current_run_writes_mean_and_skips_empty_club() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let tracker = liverpool_tracker(store.clone());
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap();

        let summary = tracker.run_at(RunMode::Current, now).await;

        assert_eq!(summary.status, "success");
        assert_eq!(summary.teams_processed, 1);
        assert_eq!(summary.total_articles, Some(5));
        assert_eq!(summary.hourly_datapoints, None);
        assert_eq!(summary.average_sentiment, 0.11);
        assert_eq!(summary.results, vec![TeamSentiment { team: "Liverpool".into(), sentiment: 0.11 }]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].team, "Everton");
        assert_eq!(summary.skipped[0].reason, SkipReason::NoArticles.to_string());

        let rows = store.query_since(now, 10).unwrap();
        assert_eq!(rows.len(), 1);
        let s = &rows[0];
        assert_eq!(s.team, "Liverpool");
        assert_eq!(s.avg_sentiment, 0.11);
        assert_eq!(s.article_count, 5);
        assert_eq!(s.sources, vec!["BBC Sport"]);
        assert_eq!(s.timestamp, now);
        // Own name is denylisted.
        let topics: Vec<_> = s.key_topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(topics, vec!["Mohamed Salah"]);
    }

    #[tokio::test]
    async fn repeated_runs_append_independent_snapshots() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let tracker = liverpool_tracker(store.clone());
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap();
        tracker.run_at(RunMode::Current, now).await;
        tracker.run_at(RunMode::Current, now).await;
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn backfill_writes_one_record_per_hour() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let tracker = liverpool_tracker(store.clone());
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 3, 30, 0).unwrap();

        let summary = tracker.run_at(RunMode::Backfill, now).await;

        assert_eq!(summary.teams_processed, 1);
        assert_eq!(summary.hourly_datapoints, Some(4));
        assert_eq!(summary.total_articles, None);
        let rows = store.query_since(snapshot::day_start(now), 100).unwrap();
        assert_eq!(rows.len(), 4);
        for r in &rows {
            assert!((r.avg_sentiment - 0.11).abs() <= snapshot::BACKFILL_JITTER + 1e-9);
            assert_eq!(r.article_count, 5);
        }
    }

    #[tokio::test]
    async fn unscorable_articles_skip_the_club() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let nlp = Arc::new(ScriptedNlp { scores: HashMap::new(), entities: vec![] });
        let providers: Vec<Box<dyn ArticleProvider>> = vec![Box::new(StaticProvider {
            source: FeedSource::SkySports,
            scope: FeedScope::Shared,
            texts: vec!["Everton confirm a new stadium opening date next season".into()],
        })];
        let tracker = Tracker::new(two_club_roster(), providers, nlp, store.clone());

        let summary = tracker.run(RunMode::Current).await;

        assert_eq!(summary.teams_processed, 0);
        assert_eq!(summary.average_sentiment, 0.0);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped[1].reason, SkipReason::NoScoredArticles.to_string());
        assert_eq!(store.count().unwrap(), 0);
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn append(&self, _s: &SentimentSnapshot) -> Result<i64> {
            anyhow::bail!("disk full")
        }
        fn query_since(&self, _since: DateTime<Utc>, _limit: usize) -> Result<Vec<SentimentSnapshot>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn store_failure_is_a_skip_not_an_abort() {
        let tracker = liverpool_tracker(Arc::new(FailingStore));
        let summary = tracker.run(RunMode::Current).await;
        assert_eq!(summary.status, "success");
        assert_eq!(summary.teams_processed, 0);
        assert!(summary.skipped[0].reason.contains("disk full"));
    }

    #[tokio::test]
    async fn per_club_sources_bypass_attribution() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let nlp = Arc::new(crate::nlp::LexiconNlp::new());
        let providers: Vec<Box<dyn ArticleProvider>> = vec![Box::new(StaticProvider {
            source: FeedSource::GoogleNews,
            scope: FeedScope::PerClub,
            texts: vec!["Everton earn a brilliant win with a superb late goal".into()],
        })];
        let tracker = Tracker::new(two_club_roster(), providers, nlp, store)
            .with_attribution(AttributionPolicy::WholeToken);
        let articles = tracker
            .collect_articles(tracker.roster().get("Everton").unwrap(), None)
            .await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, FeedSource::GoogleNews);
    }

    /// Blows up for one club only.
    struct PanickingProvider {
        club: &'static str,
    }

    #[async_trait]
    impl ArticleProvider for PanickingProvider {
        async fn fetch(&self, club: &Club, _since: Option<NaiveDate>) -> Result<Vec<Article>> {
            if club.name == self.club {
                panic!("feed parser exploded for {}", club.name);
            }
            Ok(vec![])
        }
        fn source(&self) -> FeedSource {
            FeedSource::SkySports
        }
        fn scope(&self) -> FeedScope {
            FeedScope::Shared
        }
    }

    #[tokio::test]
    async fn panic_in_one_club_does_not_stop_the_run() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let chelsea = "Chelsea grind out a deserved win at Stamford Bridge";
        let nlp = Arc::new(ScriptedNlp {
            scores: HashMap::from([(chelsea.to_string(), 0.25)]),
            entities: vec![],
        });
        let providers: Vec<Box<dyn ArticleProvider>> = vec![
            Box::new(PanickingProvider { club: "Arsenal" }),
            Box::new(StaticProvider {
                source: FeedSource::BbcSport,
                scope: FeedScope::Shared,
                texts: vec![chelsea.to_string()],
            }),
        ];
        let roster = Arc::new(
            Roster::from_clubs(vec![
                Club::new("Arsenal", &["Arsenal", "Gunners"]),
                Club::new("Chelsea", &["Chelsea", "Blues"]),
            ])
            .unwrap(),
        );
        let tracker = Tracker::new(roster, providers, nlp, store.clone());

        let summary = tracker.run(RunMode::Current).await;

        assert_eq!(summary.status, "success");
        assert_eq!(summary.results, vec![TeamSentiment { team: "Chelsea".into(), sentiment: 0.25 }]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].team, "Arsenal");
        assert_eq!(
            summary.skipped[0].reason,
            "unexpected failure: feed parser exploded for Arsenal"
        );
        assert_eq!(store.count().unwrap(), 1);

        // The lock is released after a caught panic.
        let again = tracker.run(RunMode::Current).await;
        assert_eq!(again.teams_processed, 1);
    }

    #[test]
    fn summary_serializes_expected_shape() {
        let s = RunSummary::from_outcomes(
            RunMode::Current,
            vec![("Arsenal".into(), ClubOutcome::Skipped(SkipReason::NoArticles))],
        );
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["mode"], "current");
        assert_eq!(v["total_articles"], 0);
        assert!(v.get("hourly_datapoints").is_none());
        assert_eq!(v["skipped"][0]["reason"], "no articles found");
    }
}
