//! Connection and index configuration.
//!
//! - `QDRANT_HOST`    (default `localhost`)
//! - `QDRANT_PORT`    (default `6334`, gRPC)
//! - `QDRANT_API_KEY` (empty = none)
//! - `INDEX_NAME`     (default `ai.training.openai`)

use crate::errors::{RagError, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6334;
pub const DEFAULT_INDEX: &str = "ai.training.openai";

/// Configuration of the read-only document index.
#[derive(Clone, Debug, PartialEq)]
pub struct RagConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Existing collection holding the reference documents.
    pub index: String,
}

impl RagConfig {
    pub fn new_default(url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            index: index.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Resolves the config through `lookup`; only a malformed port fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("QDRANT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("QDRANT_PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| RagError::EnvParse {
                var: "QDRANT_PORT",
                reason: "expected u16 (1..=65535)",
            })?,
            None => DEFAULT_PORT,
        };

        let qdrant_url = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}:{port}", host.trim_end_matches('/'))
        } else {
            format!("http://{host}:{port}")
        };

        let cfg = Self {
            qdrant_url,
            qdrant_api_key: get("QDRANT_API_KEY"),
            index: get("INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<()> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.index.trim().is_empty() {
            return Err(RagError::Config("index name is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_qdrant() {
        let cfg = RagConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.qdrant_url, "http://localhost:6334");
        assert_eq!(cfg.qdrant_api_key, None);
        assert_eq!(cfg.index, "ai.training.openai");
    }

    #[test]
    fn host_port_and_key_are_read() {
        let cfg = RagConfig::from_lookup(|k| match k {
            "QDRANT_HOST" => Some("qdrant.internal".into()),
            "QDRANT_PORT" => Some("7334".into()),
            "QDRANT_API_KEY" => Some("".into()),
            "INDEX_NAME" => Some("docs".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.qdrant_url, "http://qdrant.internal:7334");
        assert_eq!(cfg.qdrant_api_key, None);
        assert_eq!(cfg.index, "docs");
    }

    #[test]
    fn non_numeric_port_fails() {
        let err = RagConfig::from_lookup(|k| (k == "QDRANT_PORT").then(|| "sixty".to_string()));
        assert!(matches!(
            err,
            Err(RagError::EnvParse {
                var: "QDRANT_PORT",
                ..
            })
        ));
    }
}
