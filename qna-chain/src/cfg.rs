//! Runtime configuration loaded from environment variables.
//!
//! [`QnaSettings`] is resolved once at startup and never reloaded.

use ai_llm_service::LlmSettings;
use llm_cache::CacheConfig;
use rag_store::RagConfig;

use crate::error::{QnaError, Result};

pub const DEFAULT_TOP_K: usize = 6;

/// Retrieval knobs of the answer pipeline.
///
/// - `RAG_TOP_K`       (default 6, must be > 0)
/// - `RAG_SCORE_FLOOR` (unset = no floor)
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig {
    pub top_k: usize,
    pub score_floor: Option<f32>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            score_floor: None,
        }
    }
}

impl ChainConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let top_k = match get("RAG_TOP_K") {
            Some(v) => v
                .parse::<usize>()
                .ok()
                .filter(|k| *k > 0)
                .ok_or_else(|| {
                    QnaError::Config(format!("RAG_TOP_K must be a positive integer, got '{v}'"))
                })?,
            None => DEFAULT_TOP_K,
        };

        let score_floor = match get("RAG_SCORE_FLOOR") {
            Some(v) => Some(
                v.parse::<f32>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| {
                        QnaError::Config(format!("RAG_SCORE_FLOOR must be a number, got '{v}'"))
                    })?,
            ),
            None => None,
        };

        Ok(Self { top_k, score_floor })
    }
}

/// Every setting of the process, grouped by consumer.
#[derive(Clone, Debug)]
pub struct QnaSettings {
    pub llm: LlmSettings,
    pub rag: RagConfig,
    pub cache: CacheConfig,
    pub chain: ChainConfig,
}

impl QnaSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Fails on the first malformed value, reporting its variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            llm: LlmSettings::from_lookup(&lookup)?,
            rag: RagConfig::from_lookup(&lookup)?,
            cache: CacheConfig::from_lookup(&lookup)?,
            chain: ChainConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_cache::CacheMode;

    #[test]
    fn empty_environment_resolves_defaults() {
        let s = QnaSettings::from_lookup(|_| None).unwrap();
        assert_eq!(s.chain, ChainConfig::default());
        assert_eq!(s.cache.mode, CacheMode::Disabled);
        assert_eq!(s.rag.index, "ai.training.openai");
        assert_eq!(s.llm.answer.model, "gpt-3.5-turbo");
    }

    #[test]
    fn chain_knobs_are_validated() {
        let ok = ChainConfig::from_lookup(|k| match k {
            "RAG_TOP_K" => Some("4".into()),
            "RAG_SCORE_FLOOR" => Some("0.6".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(ok.top_k, 4);
        assert_eq!(ok.score_floor, Some(0.6));

        let only = |key: &'static str, value: &'static str| {
            move |k: &str| (k == key).then(|| value.to_string())
        };
        let err = ChainConfig::from_lookup(only("RAG_TOP_K", "0")).unwrap_err();
        assert!(err.to_string().contains("RAG_TOP_K must be a positive integer, got '0'"));
        let err = ChainConfig::from_lookup(only("RAG_SCORE_FLOOR", "high")).unwrap_err();
        assert!(err.to_string().contains("RAG_SCORE_FLOOR must be a number, got 'high'"));
    }

    #[test]
    fn malformed_port_fails_the_whole_resolution() {
        let err = QnaSettings::from_lookup(|k| (k == "QDRANT_PORT").then(|| "x".to_string()));
        assert!(matches!(err, Err(QnaError::Config(m)) if m.contains("QDRANT_PORT")));
    }
}
