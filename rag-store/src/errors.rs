//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Present but malformed environment value (e.g. non-numeric port).
    #[error("env parse error in {var}: {reason}")]
    EnvParse {
        var: &'static str,
        reason: &'static str,
    },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The configured index does not exist in the vector database.
    #[error("index '{index}' not found at {url}")]
    MissingIndex { url: String, index: String },

    /// Qdrant client errors (wrapped); unreachable server included.
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

pub type Result<T> = std::result::Result<T, RagError>;
