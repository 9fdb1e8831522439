// src/config/mod.rs
pub mod app;
pub mod nlp;

pub use app::AppConfig;
pub use nlp::{NlpConfig, NlpProviderKind};
