use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shuttle_axum::axum::{
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::dashboard::{self, SentimentFilter};
use crate::engine::{RunSummary, Tracker};
use crate::snapshot::{RunMode, SentimentSnapshot};
use crate::store::SnapshotStore;

#[derive(Clone)]
pub struct AppState {
    tracker: Arc<Tracker>,
    store: Arc<dyn SnapshotStore>,
}

impl AppState {
    pub fn new(tracker: Arc<Tracker>) -> Self {
        let store = tracker.store().clone();
        Self { tracker, store }
    }
}

/// Trigger and dashboard routes. `/metrics` is merged in by the caller.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/run", get(run_current).post(run_current))
        .route("/run/backfill", get(run_backfill).post(run_backfill))
        .route("/api/snapshots", get(api_snapshots))
        .route("/api/rankings", get(api_rankings))
        .route("/api/overview", get(api_overview))
        .route("/api/trends", get(api_trends))
        .route("/api/topics", get(api_topics))
        .route("/api/sources", get(api_sources))
        .route("/api/report", get(api_report))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn run_current(State(state): State<AppState>) -> Json<RunSummary> {
    Json(state.tracker.run(RunMode::Current).await)
}

async fn run_backfill(State(state): State<AppState>) -> Json<RunSummary> {
    Json(state.tracker.run(RunMode::Backfill).await)
}

#[derive(Debug, Default, Deserialize)]
struct WindowQuery {
    days: Option<i64>,
    #[serde(default)]
    sentiment: SentimentFilter,
    teams: Option<String>,
}

/// `Query<WindowQuery>` whose rejection is a JSON 400 like the other error paths.
struct Window(WindowQuery);

impl<S: Send + Sync> FromRequestParts<S> for Window {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<WindowQuery>::from_request_parts(parts, state).await {
            Ok(Query(q)) => Ok(Window(q)),
            Err(rejection) => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": rejection.body_text(),
                    "hints": [
                        "sentiment is one of all, positive, negative, neutral",
                        "days is a whole number between 1 and 30",
                        "teams is a comma-separated list of club names",
                    ],
                })),
            )
                .into_response()),
        }
    }
}

/// Store failures surface as 500 with troubleshooting hints.
struct StoreError(anyhow::Error);

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        tracing::warn!(target: "store", error = ?self.0, "dashboard query failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("{:#}", self.0),
                "troubleshooting": [
                    "Check that TRACKER_DB_PATH points at a readable database file",
                    "Verify the database was created by at least one pipeline run",
                    "Trigger /run and reload",
                ],
            })),
        )
            .into_response()
    }
}

fn empty_state() -> Response {
    Json(json!({
        "state": "empty",
        "hints": [
            "Trigger /run (or /run/backfill) at least once",
            "Check the tracker logs for feed or NLP errors",
            "Widen the window with ?days= or relax ?sentiment=",
        ],
    }))
    .into_response()
}

/// Filtered window rows; `None` when the window is empty.
/// The SQLite read runs on the blocking pool.
async fn window(
    state: &AppState,
    q: &WindowQuery,
    now: DateTime<Utc>,
) -> Result<Option<Vec<SentimentSnapshot>>, StoreError> {
    let days = dashboard::clamp_days(q.days);
    let filter = q.sentiment;
    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || {
        dashboard::load_window(store.as_ref(), days, filter, now)
    })
    .await
    .map_err(|e| StoreError(anyhow::anyhow!("window query task failed: {e}")))?
    .map_err(StoreError)?;
    Ok((!rows.is_empty()).then_some(rows))
}

async fn respond<T: Serialize>(
    state: &AppState,
    q: &WindowQuery,
    view: impl FnOnce(&[SentimentSnapshot]) -> T,
) -> Result<Response, StoreError> {
    Ok(match window(state, q, Utc::now()).await? {
        Some(rows) => Json(view(&rows)).into_response(),
        None => empty_state(),
    })
}

async fn api_snapshots(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    let days = dashboard::clamp_days(q.days);
    respond(&state, &q, |rows| {
        json!({
            "days": days,
            "sentiment": q.sentiment,
            "count": rows.len(),
            "snapshots": rows,
        })
    })
    .await
}

async fn api_rankings(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    respond(&state, &q, dashboard::rankings).await
}

async fn api_overview(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    respond(&state, &q, dashboard::overview).await
}

async fn api_trends(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    let requested = dashboard::parse_team_list(q.teams.as_deref());
    respond(&state, &q, |rows| {
        let teams = dashboard::select_teams(rows, &requested);
        dashboard::trends(rows, &teams)
    })
    .await
}

async fn api_topics(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    respond(&state, &q, dashboard::topics).await
}

async fn api_sources(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    respond(&state, &q, dashboard::source_breakdown).await
}

async fn api_report(
    State(state): State<AppState>,
    Window(q): Window,
) -> Result<Response, StoreError> {
    let requested = dashboard::parse_team_list(q.teams.as_deref());
    let now = Utc::now();
    respond(&state, &q, |rows| {
        let teams = dashboard::select_teams(rows, &requested);
        json!({
            "teams": teams,
            "report": dashboard::summary_report(rows, &teams, now),
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::LexiconNlp;
    use crate::store::SqliteStore;
    use crate::teams::Roster;
    use shuttle_axum::axum::body::{to_bytes, Body};
    use shuttle_axum::axum::http::Request;
    use tower::ServiceExt;

    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn append(&self, _s: &SentimentSnapshot) -> anyhow::Result<i64> {
            anyhow::bail!("read-only")
        }
        fn query_since(
            &self,
            _since: DateTime<Utc>,
            _limit: usize,
        ) -> anyhow::Result<Vec<SentimentSnapshot>> {
            anyhow::bail!("database is locked")
        }
    }

    fn router_with(store: Arc<dyn SnapshotStore>) -> Router {
        let tracker = Tracker::new(
            Arc::new(Roster::premier_league()),
            vec![],
            Arc::new(LexiconNlp::new()),
            store,
        );
        create_router(AppState::new(Arc::new(tracker)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn empty_store_yields_empty_state() {
        let app = router_with(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let (status, v) = get_json(app, "/api/rankings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["state"], "empty");
        assert!(v["hints"].as_array().is_some_and(|h| !h.is_empty()));
    }

    #[tokio::test]
    async fn store_failure_yields_500_with_troubleshooting() {
        let app = router_with(Arc::new(BrokenStore));
        let (status, v) = get_json(app, "/api/overview").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(v["error"].as_str().unwrap().contains("database is locked"));
        assert!(v["troubleshooting"].is_array());
    }

    #[tokio::test]
    async fn run_with_no_sources_still_succeeds() {
        let app = router_with(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let resp = app
            .oneshot(Request::post("/run").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["teams_processed"], 0);
        assert_eq!(v["skipped"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn sentiment_filter_ignores_case() {
        let app = router_with(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let (status, v) = get_json(app, "/api/rankings?sentiment=Positive").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["state"], "empty");
    }

    #[tokio::test]
    async fn bad_query_is_a_json_400() {
        let app = router_with(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let (status, v) = get_json(app.clone(), "/api/overview?sentiment=ecstatic").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(v["error"].as_str().unwrap().contains("ecstatic"));
        assert!(v["hints"].is_array());

        let (status, v) = get_json(app, "/api/snapshots?days=fortnight").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(v["error"].is_string());
    }
}
