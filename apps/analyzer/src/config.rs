use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::similarity::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::skill::dynamic_matcher::DEFAULT_MODEL_PATH;
use crate::skill::list_matcher::DEFAULT_THRESHOLD;
use crate::skill::morphology::DEFAULT_TOKENIZER_PATH;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; optional collaborators stay disabled when unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub fuzzy_threshold: f64,
    /// nlprule English tokenizer binary; required at startup
    pub nlprule_tokenizer_path: PathBuf,
    /// Lemma override table. None → embedded English table
    pub lemma_table_path: Option<PathBuf>,
    pub skill_model_path: PathBuf,
    /// None → AI recommendations disabled
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    /// None → local TF-IDF similarity
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let fuzzy_threshold = match optional("FUZZY_THRESHOLD") {
            Some(raw) => raw
                .parse::<f64>()
                .context("FUZZY_THRESHOLD must be a number")?,
            None => DEFAULT_THRESHOLD,
        };
        if !(0.0..=100.0).contains(&fuzzy_threshold) {
            bail!("FUZZY_THRESHOLD must be within 0..=100, got {fuzzy_threshold}");
        }

        Ok(Config {
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            fuzzy_threshold,
            nlprule_tokenizer_path: optional("NLPRULE_TOKENIZER_PATH")
                .unwrap_or_else(|| DEFAULT_TOKENIZER_PATH.to_string())
                .into(),
            lemma_table_path: optional("LEMMA_TABLE_PATH").map(PathBuf::from),
            skill_model_path: optional("SKILL_MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            llm_model: optional("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            embedding_api_url: optional("EMBEDDING_API_URL"),
            embedding_api_key: optional("EMBEDDING_API_KEY"),
            embedding_model: optional("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            max_upload_bytes: match optional("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a positive integer")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.fuzzy_threshold, 95.0);
        assert_eq!(
            config.nlprule_tokenizer_path,
            PathBuf::from(DEFAULT_TOKENIZER_PATH)
        );
        assert!(config.lemma_table_path.is_none());
        assert_eq!(config.skill_model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.llm_model, DEFAULT_MODEL);
        assert!(config.embedding_api_url.is_none());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("FUZZY_THRESHOLD", "90"),
            ("SKILL_MODEL_PATH", "/srv/model.jsonl"),
            ("NLPRULE_TOKENIZER_PATH", "/srv/en_tokenizer.bin"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("EMBEDDING_API_URL", "http://localhost:8000/v1/embeddings"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.fuzzy_threshold, 90.0);
        assert_eq!(config.skill_model_path, PathBuf::from("/srv/model.jsonl"));
        assert_eq!(
            config.nlprule_tokenizer_path,
            PathBuf::from("/srv/en_tokenizer.bin")
        );
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
        assert!(config.embedding_api_url.is_some());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("ANTHROPIC_API_KEY", "  ")]).unwrap();
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("FUZZY_THRESHOLD", "high")]).is_err());
        assert!(config_from(&[("FUZZY_THRESHOLD", "150")]).is_err());
        assert!(config_from(&[("MAX_UPLOAD_BYTES", "-1")]).is_err());
    }
}
