//! # Sentiment & entity aggregation
//! Scores a club's attributed articles and extracts up to three salient,
//! non-generic key topics.
//!
//! - Only the first `MAX_SCORED_ARTICLES` articles are scored; shorter than
//!   `MIN_ARTICLE_CHARS` are skipped; failures are dropped per article.
//! - Average is the plain mean of successful scores, rounded to 3 decimals.
//! - One entity call over the first `ENTITY_ARTICLES` articles.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;

use crate::ingest::types::Article;
use crate::nlp::{Entity, NlpClient};

pub const MAX_SCORED_ARTICLES: usize = 7;
pub const MIN_ARTICLE_CHARS: usize = 30;
pub const SENTIMENT_CHAR_BUDGET: usize = 1000;

pub const ENTITY_ARTICLES: usize = 5;
pub const ENTITY_PER_ARTICLE_CHARS: usize = 500;
pub const ENTITY_CHAR_BUDGET: usize = 3000;
/// Candidates examined from the extractor's list.
pub const ENTITY_SCAN_LIMIT: usize = 10;
pub const MAX_KEY_TOPICS: usize = 3;
pub const MIN_TOPIC_CHARS: usize = 4;
pub const MIN_SALIENCE: f64 = 0.02;

/// Key topic as persisted on a snapshot.
pub type KeyTopic = Entity;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("nlp_calls_total", "Calls made to the NLP provider.");
        describe_counter!("nlp_errors_total", "Failed NLP provider calls.");
    });
}

/// Round to 3 decimal places.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Char-boundary-safe prefix of at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Mean rounded to 3 decimals; `None` for an empty slice.
pub fn mean_rounded(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(round3(scores.iter().sum::<f64>() / scores.len() as f64))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredArticles {
    pub scores: Vec<f64>,
    /// Sources of the successfully scored articles.
    pub sources: BTreeSet<String>,
}

/// Score a single text; `None` on provider failure (logged).
pub async fn score_text(nlp: &dyn NlpClient, text: &str) -> Option<f64> {
    ensure_metrics_described();
    counter!("nlp_calls_total", "op" => "sentiment").increment(1);
    match nlp
        .analyze_sentiment(truncate_chars(text, SENTIMENT_CHAR_BUDGET))
        .await
    {
        Ok(s) => Some(s.clamp(-1.0, 1.0)),
        Err(e) => {
            tracing::warn!(target: "nlp", provider = nlp.name(), error = %e, "sentiment analysis error");
            counter!("nlp_errors_total", "op" => "sentiment").increment(1);
            None
        }
    }
}

pub async fn score_articles(nlp: &dyn NlpClient, articles: &[Article]) -> ScoredArticles {
    let mut out = ScoredArticles::default();
    for a in articles.iter().take(MAX_SCORED_ARTICLES) {
        if a.text.chars().count() < MIN_ARTICLE_CHARS {
            continue;
        }
        if let Some(s) = score_text(nlp, &a.text).await {
            out.scores.push(s);
            out.sources.insert(a.source.as_str().to_string());
        }
    }
    out
}

/// Text submitted for entity extraction.
pub fn entity_input(articles: &[Article]) -> String {
    let joined = articles
        .iter()
        .take(ENTITY_ARTICLES)
        .map(|a| truncate_chars(&a.text, ENTITY_PER_ARTICLE_CHARS))
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&joined, ENTITY_CHAR_BUDGET).to_string()
}

fn is_url_like(name: &str) -> bool {
    let n = name.to_ascii_lowercase();
    n.contains("://")
        || n.starts_with("www.")
        || [".com", ".co.uk", ".org", ".net", ".html"]
            .iter()
            .any(|tld| n.contains(tld))
}

fn is_numeric(name: &str) -> bool {
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    !compact.is_empty()
        && compact
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '%' | '/' | ':'))
}

/// Keep qualifying entities in provider order until `MAX_KEY_TOPICS` are found.
pub fn select_key_topics(entities: &[Entity], denylist: &BTreeSet<String>) -> Vec<KeyTopic> {
    let mut out = Vec::with_capacity(MAX_KEY_TOPICS);
    for e in entities.iter().take(ENTITY_SCAN_LIMIT) {
        let name = e.name.trim();
        if denylist.contains(&name.to_lowercase())
            || name.chars().count() < MIN_TOPIC_CHARS
            || is_url_like(name)
            || is_numeric(name)
        {
            continue;
        }
        if e.salience > MIN_SALIENCE {
            out.push(KeyTopic {
                name: name.to_string(),
                kind: e.kind.clone(),
                salience: round3(e.salience),
            });
        }
        if out.len() >= MAX_KEY_TOPICS {
            break;
        }
    }
    out
}

/// One extractor call over the leading articles; failure yields no topics.
pub async fn extract_key_topics(
    nlp: &dyn NlpClient,
    articles: &[Article],
    denylist: &BTreeSet<String>,
) -> Vec<KeyTopic> {
    ensure_metrics_described();
    let input = entity_input(articles);
    if input.is_empty() {
        return Vec::new();
    }
    counter!("nlp_calls_total", "op" => "entities").increment(1);
    match nlp.analyze_entities(&input).await {
        Ok(entities) => select_key_topics(&entities, denylist),
        Err(e) => {
            tracing::warn!(target: "nlp", provider = nlp.name(), error = %e, "entity extraction error");
            counter!("nlp_errors_total", "op" => "entities").increment(1);
            Vec::new()
        }
    }
}

/// Aggregated view of one club for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubAggregate {
    pub avg_sentiment: f64,
    pub article_count: usize,
    pub sources: BTreeSet<String>,
    pub key_topics: Vec<KeyTopic>,
}

/// `None` when no article could be scored.
pub async fn aggregate_club(
    nlp: &dyn NlpClient,
    articles: &[Article],
    denylist: &BTreeSet<String>,
) -> Option<ClubAggregate> {
    let scored = score_articles(nlp, articles).await;
    let avg = mean_rounded(&scored.scores)?;
    let key_topics = extract_key_topics(nlp, articles, denylist).await;
    Some(ClubAggregate {
        avg_sentiment: avg,
        article_count: scored.scores.len(),
        sources: scored.sources,
        key_topics,
    })
}
