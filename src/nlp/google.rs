// src/nlp/google.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Entity, NlpClient, NlpError};

pub const DEFAULT_BASE_URL: &str = "https://language.googleapis.com/v1";

/// Cloud Natural Language API (`documents:analyzeSentiment` / `documents:analyzeEntities`).
pub struct GoogleNlpClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Req<'a> {
    document: Document<'a>,
    encoding_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentResp {
    document_sentiment: Option<DocSentiment>,
}

#[derive(Deserialize)]
struct DocSentiment {
    #[serde(default)]
    score: f64,
}

#[derive(Deserialize)]
struct EntitiesResp {
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Deserialize)]
struct RawEntity {
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    salience: f64,
}

impl GoogleNlpClient {
    /// `base_url_override`: e.g. a mock server; defaults to the public v1 endpoint.
    pub fn new(api_key: &str, base_url_override: Option<&str>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(crate::ingest::providers::USER_AGENT)
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .context("building nlp http client")?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url_override
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    async fn call<T: for<'de> Deserialize<'de>>(&self, method: &str, text: &str) -> Result<T, NlpError> {
        if self.api_key.is_empty() {
            return Err(NlpError::MissingKey("google"));
        }
        let req = Req {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };
        let resp = self
            .http
            .post(format!("{}/documents:{method}", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NlpError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| NlpError::Malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl NlpClient for GoogleNlpClient {
    async fn analyze_sentiment(&self, text: &str) -> Result<f64, NlpError> {
        let body: SentimentResp = self.call("analyzeSentiment", text).await?;
        let s = body
            .document_sentiment
            .ok_or_else(|| NlpError::Malformed("missing documentSentiment".into()))?;
        Ok(s.score.clamp(-1.0, 1.0))
    }

    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        let body: EntitiesResp = self.call("analyzeEntities", text).await?;
        Ok(body
            .entities
            .into_iter()
            .map(|e| Entity {
                name: e.name,
                kind: e.kind.unwrap_or_else(|| "UNKNOWN".to_string()),
                salience: e.salience.clamp(0.0, 1.0),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
