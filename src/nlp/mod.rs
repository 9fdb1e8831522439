//! NLP adapter: provider abstraction for sentiment scoring and entity extraction.
//!
//! - `GoogleNlpClient`: Cloud Natural Language REST API.
//! - `LexiconNlp`: offline provider, no network, used for local runs and tests.

pub mod google;
pub mod lexicon;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::nlp::{NlpConfig, NlpProviderKind};

pub use google::GoogleNlpClient;
pub use lexicon::LexiconNlp;

/// Entity as returned by the extractor, in the extractor's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub salience: f64,
}

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("missing API key for {0}")]
    MissingKey(&'static str),
    #[error("http transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait NlpClient: Send + Sync {
    /// Document sentiment score in [-1, 1].
    async fn analyze_sentiment(&self, text: &str) -> Result<f64, NlpError>;
    /// Entities ordered by the provider (usually by salience, descending).
    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, NlpError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynNlp = Arc<dyn NlpClient>;

/// Factory: build a client according to config.
///
/// * `provider = "google"` with a resolved key → `GoogleNlpClient`.
/// * Anything else (or a missing key) → `LexiconNlp`, with a warning.
pub fn build_client(cfg: &NlpConfig) -> DynNlp {
    match cfg.provider {
        NlpProviderKind::Google => match cfg.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                match GoogleNlpClient::new(key, cfg.base_url.as_deref()) {
                    Ok(c) => Arc::new(c),
                    Err(e) => {
                        tracing::warn!(target: "nlp", error = %e, "google nlp client unavailable; using lexicon");
                        Arc::new(LexiconNlp::new())
                    }
                }
            }
            _ => {
                tracing::warn!(target: "nlp", "google nlp selected without api key; using lexicon");
                Arc::new(LexiconNlp::new())
            }
        },
        NlpProviderKind::Lexicon => Arc::new(LexiconNlp::new()),
    }
}
