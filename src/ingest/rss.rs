// src/ingest/rss.rs
//! RSS 2.0 channel parsing shared by all feed providers.

use anyhow::{Context, Result};
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::types::{Article, FeedSource};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Parse an RSS document into at most `limit` articles tagged with `source`.
/// Items whose normalized text is empty are skipped and do not count toward the limit.
pub fn parse_channel(xml: &str, source: FeedSource, limit: usize) -> Result<Vec<Article>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean)
        .with_context(|| format!("parsing {} rss xml", source.as_str()))?;

    let mut out = Vec::with_capacity(rss.channel.item.len().min(limit));
    for it in rss.channel.item {
        if out.len() >= limit {
            break;
        }
        let text_raw = format!(
            "{} {}",
            it.title.as_deref().unwrap_or_default(),
            it.description.as_deref().unwrap_or_default()
        );
        let text = normalize_text(&text_raw);
        if text.is_empty() {
            continue;
        }
        out.push(Article {
            text,
            source,
            published: it.pub_date.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            link: it.link.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_parse_ms").record(ms);
    Ok(out)
}

/// XML only knows five named entities; feeds still ship HTML ones.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&pound;", "£")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Football</title>
    <item>
      <title>Arsenal edge Chelsea&nbsp;in derby</title>
      <description><![CDATA[<p>Late winner for the <b>Gunners</b></p>]]></description>
      <link>https://example.test/a</link>
      <pubDate>Sat, 18 Oct 2026 14:00:00 GMT</pubDate>
    </item>
    <item>
      <title></title>
    </item>
    <item>
      <title>Second story</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_and_skips_empty_text() {
        let out = parse_channel(XML, FeedSource::BbcSport, 20).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Arsenal edge Chelsea in derby Late winner for the Gunners");
        assert_eq!(out[0].link.as_deref(), Some("https://example.test/a"));
        assert!(out[0].published.is_some());
        assert_eq!(out[1].text, "Second story");
        assert!(out[1].link.is_none());
        assert!(out.iter().all(|a| a.source == FeedSource::BbcSport));
    }

    #[test]
    fn limit_caps_output() {
        let out = parse_channel(XML, FeedSource::SkySports, 1).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn channel_without_items_is_empty() {
        let xml = r#"<rss><channel><title>x</title></channel></rss>"#;
        assert!(parse_channel(xml, FeedSource::BbcSport, 10).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_channel("not xml at all", FeedSource::BbcSport, 10).is_err());
    }
}
