//! Cache mode and knobs resolved from the environment.
//!
//! - `CACHE_TYPE`              = `standard` | `exact` | `semantic` | `none` (unset = disabled)
//! - `CACHE_SCORE_THRESHOLD`   = max cosine distance for a semantic hit (default 0.2)
//! - `CACHE_COLLECTION_PREFIX` = prefix of the cache collections (default `llmcache`)

use std::fmt;

use tracing::warn;

use crate::errors::{CacheError, Result};

pub const DEFAULT_MAX_DISTANCE: f32 = 0.2;
pub const DEFAULT_COLLECTION_PREFIX: &str = "llmcache";

/// Which cache sits in front of the answer generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Every lookup misses.
    #[default]
    Disabled,
    /// Hit only on byte-identical prompt text.
    Exact,
    /// Hit when a stored prompt embedding is within the max distance.
    Semantic,
}

impl CacheMode {
    /// Parses a `CACHE_TYPE` value; `None` for unknown values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "disabled" | "off" => Some(CacheMode::Disabled),
            "standard" | "exact" => Some(CacheMode::Exact),
            "semantic" => Some(CacheMode::Semantic),
            _ => None,
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheMode::Disabled => "disabled",
            CacheMode::Exact => "exact",
            CacheMode::Semantic => "semantic",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub mode: CacheMode,
    /// Maximum cosine distance (`1 - similarity`) accepted as a semantic hit.
    pub max_distance: f32,
    pub collection_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: CacheMode::Disabled,
            max_distance: DEFAULT_MAX_DISTANCE,
            collection_prefix: DEFAULT_COLLECTION_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Unknown `CACHE_TYPE` values disable the cache with a warning;
    /// a malformed threshold is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("CACHE_TYPE") {
            Some(raw) => CacheMode::parse(&raw).unwrap_or_else(|| {
                warn!(cache_type = %raw, "unknown CACHE_TYPE, answer cache disabled");
                CacheMode::Disabled
            }),
            None => CacheMode::Disabled,
        };

        let max_distance = match lookup("CACHE_SCORE_THRESHOLD").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|d| d.is_finite() && (0.0..=2.0).contains(d))
                .ok_or(CacheError::EnvParse {
                    var: "CACHE_SCORE_THRESHOLD",
                    reason: "expected a distance in 0.0..=2.0",
                })?,
            None => DEFAULT_MAX_DISTANCE,
        };

        let collection_prefix = lookup("CACHE_COLLECTION_PREFIX")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION_PREFIX.to_string());

        Ok(Self {
            mode,
            max_distance,
            collection_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_type_aliases() {
        assert_eq!(CacheMode::parse("standard"), Some(CacheMode::Exact));
        assert_eq!(CacheMode::parse("Semantic"), Some(CacheMode::Semantic));
        assert_eq!(CacheMode::parse("none"), Some(CacheMode::Disabled));
        assert_eq!(CacheMode::parse("redis"), None);
    }

    #[test]
    fn unknown_mode_disables_and_bad_threshold_fails() {
        let cfg = CacheConfig::from_lookup(|k| match k {
            "CACHE_TYPE" => Some("memcached".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg, CacheConfig::default());

        let bad = CacheConfig::from_lookup(|k| match k {
            "CACHE_TYPE" => Some("semantic".into()),
            "CACHE_SCORE_THRESHOLD" => Some("close".into()),
            _ => None,
        });
        assert!(matches!(
            bad,
            Err(CacheError::EnvParse {
                var: "CACHE_SCORE_THRESHOLD",
                ..
            })
        ));
    }

    #[test]
    fn semantic_mode_reads_threshold() {
        let cfg = CacheConfig::from_lookup(|k| match k {
            "CACHE_TYPE" => Some("semantic".into()),
            "CACHE_SCORE_THRESHOLD" => Some("0.15".into()),
            "CACHE_COLLECTION_PREFIX" => Some("qna".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.mode, CacheMode::Semantic);
        assert_eq!(cfg.max_distance, 0.15);
        assert_eq!(cfg.collection_prefix, "qna");
    }
}
