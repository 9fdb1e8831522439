// src/config/nlp.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_NLP_CONFIG_PATH: &str = "config/nlp.json";
pub const ENV_NLP_CONFIG_PATH: &str = "NLP_CONFIG_PATH";
pub const ENV_GOOGLE_NLP_API_KEY: &str = "GOOGLE_NLP_API_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NlpProviderKind {
    Google,
    #[default]
    Lexicon,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NlpConfig {
    #[serde(default)]
    pub provider: NlpProviderKind,
    /// "ENV" means: read from GOOGLE_NLP_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override for the API root (mock servers, regional endpoints).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl NlpConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: NlpConfig = serde_json::from_str(&data)?;
        cfg.resolve_env_key()?;
        Ok(cfg)
    }

    /// `$NLP_CONFIG_PATH`, then `config/nlp.json`; lexicon provider when neither exists.
    pub fn load_default() -> anyhow::Result<Self> {
        let path = env::var(ENV_NLP_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_NLP_CONFIG_PATH.into());
        if Path::new(&path).exists() {
            return Self::load_from_file(&path);
        }
        // No file: a bare key in the environment still selects Google.
        match env::var(ENV_GOOGLE_NLP_API_KEY) {
            Ok(key) if !key.trim().is_empty() => Ok(Self {
                provider: NlpProviderKind::Google,
                api_key: Some(key.trim().to_string()),
                base_url: None,
            }),
            _ => Ok(Self::default()),
        }
    }

    fn resolve_env_key(&mut self) -> anyhow::Result<()> {
        let wants_env = self
            .api_key
            .as_deref()
            .is_some_and(|k| k.trim().eq_ignore_ascii_case("env"));
        if wants_env {
            let key = env::var(ENV_GOOGLE_NLP_API_KEY)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_GOOGLE_NLP_API_KEY} env var"))?;
            self.api_key = Some(key);
        }
        Ok(())
    }
}
