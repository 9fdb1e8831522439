//! # Team attribution
//! Decides which articles are "about" a club by matching its name variants
//! against whitespace-delimited tokens of the article text.
//!
//! Two policies:
//! - `WholeToken` (default): a variant's words must equal a run of consecutive
//!   tokens. "United" matches "Manchester United win" but not "Reunited".
//! - `TokenSubstring`: each variant word only has to occur inside the
//!   corresponding token. Looser; "united" also hits "reunited".
//!
//! Tokens are lowercased and trimmed of surrounding punctuation plus a
//! trailing possessive `'s`. Neither policy can tell "United" the club from
//! "United States"; that over-match is accepted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ingest::types::Article;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributionPolicy {
    #[default]
    WholeToken,
    TokenSubstring,
}

impl FromStr for AttributionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "whole-token" | "token" => Ok(Self::WholeToken),
            "token-substring" | "substring" => Ok(Self::TokenSubstring),
            other => anyhow::bail!("unknown attribution policy: {other}"),
        }
    }
}

/// Lowercase, trim non-alphanumeric edges, drop possessive `'s`.
fn clean_token(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let trimmed = lower.trim_matches(|c: char| !c.is_alphanumeric());
    let stripped = trimmed
        .strip_suffix("'s")
        .or_else(|| trimmed.strip_suffix("\u{2019}s"))
        .unwrap_or(trimmed);
    stripped.to_string()
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Precomputed variant word lists for one club.
#[derive(Debug, Clone)]
pub struct Matcher {
    policy: AttributionPolicy,
    variants: Vec<Vec<String>>,
}

impl Matcher {
    pub fn new<S: AsRef<str>>(variants: &[S], policy: AttributionPolicy) -> Self {
        let variants = variants
            .iter()
            .map(|v| tokens(v.as_ref()))
            .filter(|words| !words.is_empty())
            .collect();
        Self { policy, variants }
    }

    pub fn matches(&self, text: &str) -> bool {
        let toks = tokens(text);
        self.variants.iter().any(|words| {
            toks.windows(words.len()).any(|run| {
                run.iter().zip(words).all(|(tok, word)| match self.policy {
                    AttributionPolicy::WholeToken => tok == word,
                    AttributionPolicy::TokenSubstring => tok.contains(word.as_str()),
                })
            })
        })
    }
}

/// Convenience single-text check.
pub fn is_about<S: AsRef<str>>(text: &str, variants: &[S], policy: AttributionPolicy) -> bool {
    Matcher::new(variants, policy).matches(text)
}

/// Keep articles mentioning any variant. Order preserved, duplicates kept.
pub fn filter_articles<S: AsRef<str>>(
    articles: Vec<Article>,
    variants: &[S],
    policy: AttributionPolicy,
) -> Vec<Article> {
    let m = Matcher::new(variants, policy);
    articles.into_iter().filter(|a| m.matches(&a.text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::FeedSource;

    fn art(text: &str) -> Article {
        Article {
            text: text.to_string(),
            source: FeedSource::BbcSport,
            published: None,
            link: None,
        }
    }

    #[test]
    fn whole_token_matches_single_word_variant() {
        let v = ["United"];
        assert!(is_about("Manchester United win again", &v, AttributionPolicy::WholeToken));
        // Known over-match: the token is the same word.
        assert!(is_about("Sanctions on United States trade", &v, AttributionPolicy::WholeToken));
        assert!(!is_about("Family reunited at last", &v, AttributionPolicy::WholeToken));
    }

    #[test]
    fn substring_policy_is_looser() {
        let v = ["united"];
        assert!(is_about("Family reunited at last", &v, AttributionPolicy::TokenSubstring));
        assert!(!is_about("Nothing relevant here", &v, AttributionPolicy::TokenSubstring));
    }

    #[test]
    fn case_punctuation_and_possessive_are_ignored() {
        let v = ["Liverpool", "LFC"];
        assert!(is_about("LIVERPOOL's title charge", &v, AttributionPolicy::WholeToken));
        assert!(is_about("Win for lfc!", &v, AttributionPolicy::WholeToken));
        assert!(is_about("(Liverpool) hold on", &v, AttributionPolicy::WholeToken));
    }

    #[test]
    fn multi_word_variant_needs_consecutive_tokens() {
        let v = ["Man City"];
        assert!(is_about("Guardiola's Man City cruise", &v, AttributionPolicy::WholeToken));
        assert!(!is_about("City man arrested", &v, AttributionPolicy::WholeToken));
        let v = ["Brighton & Hove Albion"];
        assert!(is_about("Brighton & Hove Albion sign striker", &v, AttributionPolicy::WholeToken));
    }

    #[test]
    fn short_variant_does_not_match_inside_words_by_default() {
        let v = ["AFC"];
        assert!(!is_about("Safcfans gather", &v, AttributionPolicy::WholeToken));
        assert!(is_about("Safcfans gather", &v, AttributionPolicy::TokenSubstring));
    }

    #[test]
    fn filter_preserves_order_and_duplicates() {
        let pool = vec![
            art("Spurs beat Palace"),
            art("Chelsea draw"),
            art("Spurs beat Palace"),
            art("Tottenham injury news"),
        ];
        let out = filter_articles(pool, &["Tottenham", "Spurs"], AttributionPolicy::WholeToken);
        let texts: Vec<_> = out.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Spurs beat Palace", "Spurs beat Palace", "Tottenham injury news"]
        );
    }

    #[test]
    fn empty_variants_match_nothing() {
        let v: [&str; 0] = [];
        assert!(!is_about("anything", &v, AttributionPolicy::WholeToken));
    }

    #[test]
    fn policy_parses_from_env_style_strings() {
        assert_eq!("whole_token".parse::<AttributionPolicy>().unwrap(), AttributionPolicy::WholeToken);
        assert_eq!(
            "Token-Substring".parse::<AttributionPolicy>().unwrap(),
            AttributionPolicy::TokenSubstring
        );
        assert!("fuzzy".parse::<AttributionPolicy>().is_err());
    }
}
