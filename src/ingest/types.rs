// src/ingest/types.rs
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::teams::Club;

/// Named feed a given article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeedSource {
    GoogleNews,
    BbcSport,
    SkySports,
}

impl FeedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSource::GoogleNews => "Google News",
            FeedSource::BbcSport => "BBC Sport",
            FeedSource::SkySports => "Sky Sports",
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a provider already scopes its results to one club.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Query is built per club; results are used as-is.
    PerClub,
    /// Club-agnostic pool; results must pass the attribution filter.
    Shared,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub text: String, // normalized "title description"
    pub source: FeedSource,
    pub published: Option<String>, // raw pubDate as published by the feed
    pub link: Option<String>,
}

#[async_trait::async_trait]
pub trait ArticleProvider: Send + Sync {
    /// Fetch up to the provider's limit. `since` asks for a lower date bound
    /// where the feed supports one; shared feeds ignore both arguments.
    async fn fetch(&self, club: &Club, since: Option<NaiveDate>) -> Result<Vec<Article>>;
    fn source(&self) -> FeedSource;
    fn scope(&self) -> FeedScope;
}
