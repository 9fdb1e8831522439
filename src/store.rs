//! # Snapshot store
//! Append-only document collection of `SentimentSnapshot`s, backed by SQLite.
//! Each record is stored as a JSON document next to the columns the read
//! side filters and orders on. Nothing here updates or deletes.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::snapshot::SentimentSnapshot;

/// Upper bound on records returned by a window query.
pub const MAX_QUERY_ROWS: usize = 1000;

pub trait SnapshotStore: Send + Sync {
    /// Append one record; returns its auto-assigned id.
    fn append(&self, snapshot: &SentimentSnapshot) -> Result<i64>;
    /// Records with `timestamp >= since`, newest first, at most `limit` (capped at `MAX_QUERY_ROWS`).
    fn query_since(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<SentimentSnapshot>>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Fixed-width UTC text so lexical order equals time order.
fn ts_key(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let conn =
            Connection::open(path).with_context(|| format!("Failed to open database: {path}"))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("Failed to enable WAL mode")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store mutex poisoned"))
    }

    fn run_migrations(&self) -> Result<()> {
        self.lock()?
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS team_sentiment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                team TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                avg_sentiment REAL NOT NULL,
                document TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_team_sentiment_ts ON team_sentiment (timestamp);
            ",
            )
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Total stored records.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM team_sentiment", [], |r| r.get(0))
            .context("counting snapshots")?;
        Ok(n.max(0) as usize)
    }
}

impl SnapshotStore for SqliteStore {
    fn append(&self, snapshot: &SentimentSnapshot) -> Result<i64> {
        let doc = serde_json::to_string(snapshot).context("serializing snapshot")?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO team_sentiment (team, timestamp, avg_sentiment, document) VALUES (?1, ?2, ?3, ?4)",
            params![snapshot.team, ts_key(&snapshot.timestamp), snapshot.avg_sentiment, doc],
        )
        .with_context(|| format!("inserting snapshot for {}", snapshot.team))?;
        Ok(conn.last_insert_rowid())
    }

    fn query_since(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<SentimentSnapshot>> {
        let limit = limit.min(MAX_QUERY_ROWS) as i64;
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT document FROM team_sentiment
                 WHERE timestamp >= ?1
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?2",
            )
            .context("preparing snapshot query")?;
        let rows = stmt
            .query_map(params![ts_key(&since), limit], |row| row.get::<_, String>(0))
            .context("querying snapshots")?;

        let mut out = Vec::new();
        for doc in rows {
            let doc = doc.context("reading snapshot row")?;
            match serde_json::from_str::<SentimentSnapshot>(&doc) {
                Ok(s) => out.push(s),
                Err(e) => tracing::warn!(target: "store", error = %e, "skipping unreadable snapshot document"),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn snap(team: &str, avg: f64, ts: DateTime<Utc>) -> SentimentSnapshot {
        SentimentSnapshot {
            team: team.into(),
            avg_sentiment: avg,
            article_count: 3,
            sources: vec!["BBC Sport".into()],
            key_topics: vec![],
            timestamp: ts,
            league: "Premier League".into(),
            data_type: "News Sentiment".into(),
        }
    }

    #[test]
    fn append_assigns_increasing_ids_and_allows_duplicates() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let a = store.append(&snap("Everton", 0.1, ts)).unwrap();
        let b = store.append(&snap("Everton", 0.1, ts)).unwrap();
        assert!(b > a);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn query_filters_by_cutoff_and_orders_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        for d in 0..10 {
            store
                .append(&snap("Fulham", d as f64 / 10.0, base + Duration::days(d)))
                .unwrap();
        }
        let got = store.query_since(base + Duration::days(7), 100).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].timestamp, base + Duration::days(9));
        assert_eq!(got[2].timestamp, base + Duration::days(7));
    }

    #[test]
    fn query_is_capped() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ts = Utc::now();
        for _ in 0..5 {
            store.append(&snap("Brentford", 0.0, ts)).unwrap();
        }
        assert_eq!(store.query_since(ts - Duration::hours(1), 2).unwrap().len(), 2);
    }

    #[test]
    fn document_round_trips_key_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 12, 30, 0).unwrap();
        let mut s = snap("Chelsea", -0.25, ts);
        s.key_topics = vec![crate::nlp::Entity {
            name: "Enzo Maresca".into(),
            kind: "PERSON".into(),
            salience: 0.125,
        }];
        store.append(&s).unwrap();
        let got = store.query_since(ts, 10).unwrap();
        assert_eq!(got, vec![s]);
    }

    #[test]
    fn file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/db/sentiment.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
        store.append(&snap("Wolves", 0.0, Utc::now())).unwrap();
        assert!(path.exists());
    }
}
