// src/ingest/mod.rs
pub mod providers;
pub mod rss;
pub mod types;

use crate::ingest::types::{Article, ArticleProvider};
use crate::teams::Club;
use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// Maximum characters kept from a normalized article.
pub const MAX_ARTICLE_CHARS: usize = 2000;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "feed_articles_total",
            "Articles parsed from feed providers."
        );
        describe_counter!("feed_errors_total", "Feed fetch/parse errors.");
        describe_histogram!("feed_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Normalize text: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_ARTICLE_CHARS {
        out = out.chars().take(MAX_ARTICLE_CHARS).collect();
    }

    out
}

/// Fetch from one provider; any failure is logged and yields an empty list.
pub async fn fetch_or_empty(
    provider: &dyn ArticleProvider,
    club: &Club,
    since: Option<NaiveDate>,
) -> Vec<Article> {
    ensure_metrics_described();
    let source = provider.source();
    match provider.fetch(club, since).await {
        Ok(articles) => {
            counter!("feed_articles_total", "source" => source.as_str())
                .increment(articles.len() as u64);
            tracing::debug!(
                target: "ingest",
                source = source.as_str(),
                club = %club.name,
                count = articles.len(),
                "feed fetched"
            );
            articles
        }
        Err(e) => {
            tracing::warn!(
                target: "ingest",
                error = ?e,
                source = source.as_str(),
                club = %club.name,
                "feed error"
            );
            counter!("feed_errors_total", "source" => source.as_str()).increment(1);
            Vec::new()
        }
    }
}
