//! Unified error type for the answer cache.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Errors raised by cache configuration and cache stores.
///
/// Store and embedding failures are logged and treated as misses by
/// [`crate::AnswerCache`]; only configuration errors escape to the caller.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Present but malformed environment value.
    #[error("[LLM Cache] invalid value in {var}: {reason}")]
    EnvParse {
        var: &'static str,
        reason: &'static str,
    },

    /// Qdrant client errors (wrapped).
    #[error("[LLM Cache] qdrant error: {0}")]
    Qdrant(String),

    /// The prompt could not be embedded for a semantic lookup.
    #[error("[LLM Cache] embedding failed: {0}")]
    Embedding(#[from] AiLlmError),
}

pub type Result<T> = std::result::Result<T, CacheError>;
