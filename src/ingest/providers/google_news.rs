// src/ingest/providers/google_news.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::ingest::providers::get_text;
use crate::ingest::rss::parse_channel;
use crate::ingest::types::{Article, ArticleProvider, FeedScope, FeedSource};
use crate::teams::{Club, LEAGUE};

pub const DEFAULT_BASE_URL: &str = "https://news.google.com";
/// Per-club cap used by the combined fetch.
pub const DEFAULT_LIMIT: usize = 10;

/// Google News search feed, queried per club.
pub struct GoogleNewsProvider {
    mode: Mode,
    limit: usize,
}

enum Mode {
    Fixture(String),
    Http {
        base_url: String,
        client: reqwest::Client,
    },
}

impl GoogleNewsProvider {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn from_base_url<S: Into<String>>(base_url: S, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                base_url: base_url.into().trim_end_matches('/').to_string(),
                client,
            },
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Search query for a club, e.g. `Aston Villa Premier League after:2026-10-18`.
pub fn search_query(club: &Club, since: Option<NaiveDate>) -> String {
    let mut q = format!("{} {}", club.name, LEAGUE);
    if let Some(d) = since {
        q.push_str(&format!(" after:{}", d.format("%Y-%m-%d")));
    }
    q
}

#[async_trait]
impl ArticleProvider for GoogleNewsProvider {
    async fn fetch(&self, club: &Club, since: Option<NaiveDate>) -> Result<Vec<Article>> {
        let body = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http { base_url, client } => {
                let query = search_query(club, since);
                tracing::debug!(target: "ingest", %query, "google news search");
                let req = client.get(format!("{base_url}/rss/search")).query(&[
                    ("q", query.as_str()),
                    ("hl", "en-US"),
                    ("gl", "GB"),
                    ("ceid", "GB:en"),
                ]);
                get_text(req, "google news").await?
            }
        };
        parse_channel(&body, FeedSource::GoogleNews, self.limit)
    }

    fn source(&self) -> FeedSource {
        FeedSource::GoogleNews
    }

    fn scope(&self) -> FeedScope {
        FeedScope::PerClub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<rss><channel>
        <item><title>Villa climb to fourth - BBC</title><link>https://x.test/1</link></item>
        <item><title>Emery praises squad depth</title></item>
    </channel></rss>"#;

    #[test]
    fn query_includes_league_and_optional_date() {
        let club = Club::new("Aston Villa", &["Aston Villa", "Villa"]);
        assert_eq!(search_query(&club, None), "Aston Villa Premier League");
        let d = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            search_query(&club, Some(d)),
            "Aston Villa Premier League after:2026-10-18"
        );
    }

    #[tokio::test]
    async fn http_mode_sends_club_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .and(query_param("q", "Aston Villa Premier League"))
            .and(query_param("gl", "GB"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let p = GoogleNewsProvider::from_base_url(server.uri(), reqwest::Client::new());
        let club = Club::new("Aston Villa", &["Villa"]);
        let out = p.fetch(&club, None).await.unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|a| a.source == FeedSource::GoogleNews));
    }

    #[tokio::test]
    async fn http_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let p = GoogleNewsProvider::from_base_url(server.uri(), reqwest::Client::new());
        let club = Club::new("Fulham", &["Fulham"]);
        assert!(p.fetch(&club, None).await.is_err());
    }

    #[tokio::test]
    async fn limit_applies_to_fixture() {
        let p = GoogleNewsProvider::from_fixture(FEED).with_limit(1);
        let club = Club::new("Aston Villa", &["Villa"]);
        assert_eq!(p.fetch(&club, None).await.unwrap().len(), 1);
    }
}
