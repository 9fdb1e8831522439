// src/nlp/lexicon.rs
//! Offline NLP provider: football word lexicon with short-range negation for
//! sentiment, capitalised word runs for entities.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{Entity, NlpClient, NlpError};

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../config/football_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).unwrap_or_default()
});

/// Normalisation constant for `s / sqrt(s^2 + ALPHA)`.
const ALPHA: f64 = 15.0;

#[derive(Debug, Clone, Default)]
pub struct LexiconNlp;

impl LexiconNlp {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Raw lexicon sum. A negator within the previous 1..=3 tokens flips the sign.
    pub fn raw_score(&self, text: &str) -> i32 {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score = 0;
        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }
        score
    }

    /// Raw score squashed into (-1, 1).
    pub fn score(&self, text: &str) -> f64 {
        let s = self.raw_score(text) as f64;
        if s == 0.0 {
            return 0.0;
        }
        s / (s * s + ALPHA).sqrt()
    }

    /// Runs of capitalised words (not sentence-initial stopwords), ranked by mention share.
    pub fn entities(&self, text: &str) -> Vec<Entity> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut total = 0usize;

        let mut flush = |run: &mut Vec<&str>, counts: &mut Vec<(String, usize)>| {
            if run.is_empty() {
                return;
            }
            let name = run.join(" ");
            run.clear();
            total += 1;
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, c)) => *c += 1,
                None => counts.push((name, 1)),
            }
        };

        for raw in text.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            let ends_clause = raw.ends_with(['.', ',', ';', ':', '!', '?']);
            let capitalised = word.chars().next().is_some_and(|c| c.is_uppercase())
                && !is_stopword(&word.to_lowercase());
            if capitalised {
                run.push(word);
            } else {
                flush(&mut run, &mut counts);
            }
            if ends_clause {
                flush(&mut run, &mut counts);
            }
        }
        flush(&mut run, &mut counts);

        if total == 0 {
            return Vec::new();
        }
        // Stable sort keeps first-seen order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .map(|(name, c)| Entity {
                name,
                kind: "OTHER".to_string(),
                salience: c as f64 / total as f64,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl NlpClient for LexiconNlp {
    async fn analyze_sentiment(&self, text: &str) -> Result<f64, NlpError> {
        Ok(self.score(text))
    }

    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        Ok(self.entities(text))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric (plus apostrophe) lowercase tokens.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not" | "no" | "never" | "isn't" | "wasn't" | "aren't" | "won't" | "can't" | "cannot"
            | "without" | "fail" | "failed"
    )
}

fn is_stopword(tok: &str) -> bool {
    matches!(
        tok,
        "the" | "a" | "an" | "and" | "but" | "or" | "in" | "on" | "at" | "to" | "for" | "of"
            | "after" | "before" | "as" | "with" | "his" | "her" | "their" | "it" | "is" | "i"
            | "we" | "he" | "she" | "they" | "this" | "that" | "how" | "why" | "what" | "who"
    )
}
