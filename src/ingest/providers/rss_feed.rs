// src/ingest/providers/rss_feed.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::ingest::providers::get_text;
use crate::ingest::rss::parse_channel;
use crate::ingest::types::{Article, ArticleProvider, FeedScope, FeedSource};
use crate::teams::Club;

pub const BBC_SPORT_URL: &str = "https://feeds.bbci.co.uk/sport/football/premier-league/rss.xml";
pub const SKY_SPORTS_URL: &str = "https://www.skysports.com/rss/12040";
pub const DEFAULT_LIMIT: usize = 20;

/// League-wide RSS feed. Returns the same pool for every club; callers filter it.
pub struct RssFeedProvider {
    source: FeedSource,
    mode: Mode,
    limit: usize,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssFeedProvider {
    pub fn from_fixture(source: FeedSource, s: &str) -> Self {
        Self {
            source,
            mode: Mode::Fixture(s.to_string()),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn from_url<S: Into<String>>(source: FeedSource, url: S, client: reqwest::Client) -> Self {
        Self {
            source,
            mode: Mode::Http {
                url: url.into(),
                client,
            },
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn bbc_sport(client: reqwest::Client) -> Self {
        Self::from_url(FeedSource::BbcSport, BBC_SPORT_URL, client)
    }

    pub fn sky_sports(client: reqwest::Client) -> Self {
        Self::from_url(FeedSource::SkySports, SKY_SPORTS_URL, client)
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl ArticleProvider for RssFeedProvider {
    async fn fetch(&self, _club: &Club, _since: Option<NaiveDate>) -> Result<Vec<Article>> {
        match &self.mode {
            Mode::Fixture(s) => parse_channel(s, self.source, self.limit),
            Mode::Http { url, client } => {
                let body = get_text(client.get(url.as_str()), self.source.as_str()).await?;
                parse_channel(&body, self.source, self.limit)
            }
        }
    }

    fn source(&self) -> FeedSource {
        self.source
    }

    fn scope(&self) -> FeedScope {
        FeedScope::Shared
    }
}
