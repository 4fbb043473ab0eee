//! Typed error for the qna-chain crate.

use ai_llm_service::AiLlmError;
use llm_cache::CacheError;
use rag_store::RagError;
use thiserror::Error;

/// Pipeline failures, classified by how they reach the user.
#[derive(Debug, Error)]
pub enum QnaError {
    /// Malformed configuration or a provider that cannot be constructed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The vector database or a model backend could not be reached.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// The configured index does not exist; raised while building the pipeline.
    #[error("index '{index}' not found at {url}")]
    MissingIndex { url: String, index: String },

    /// The model backend answered with an error (rate limit included) or an
    /// unusable payload.
    #[error("generation error: {0}")]
    Generation(String),
}

impl QnaError {
    /// Text shown in place of the answers.
    pub fn user_message(&self) -> String {
        match self {
            QnaError::Config(d) => format!("The service is misconfigured: {d}"),
            QnaError::Connectivity(d) => format!(
                "Could not reach the vector database or the language model. Connection error: {d}"
            ),
            QnaError::MissingIndex { url, index } => {
                format!("Can't find the document index '{index}' at {url}.")
            }
            QnaError::Generation(d) => {
                format!("The language model failed to answer the question: {d}")
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, QnaError::Config(_) | QnaError::MissingIndex { .. })
    }
}

impl From<AiLlmError> for QnaError {
    fn from(e: AiLlmError) -> Self {
        if e.is_connectivity() {
            return QnaError::Connectivity(e.to_string());
        }
        match e {
            AiLlmError::Config(c) => QnaError::Config(c.to_string()),
            AiLlmError::Provider(p) if p.is_rate_limited() => {
                QnaError::Generation(format!("rate limit reached, try again later ({p})"))
            }
            other => QnaError::Generation(other.to_string()),
        }
    }
}

impl From<RagError> for QnaError {
    fn from(e: RagError) -> Self {
        match e {
            RagError::MissingIndex { url, index } => QnaError::MissingIndex { url, index },
            RagError::Qdrant(d) => QnaError::Connectivity(d),
            other => QnaError::Config(other.to_string()),
        }
    }
}

impl From<CacheError> for QnaError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::Qdrant(d) => QnaError::Connectivity(d),
            other => QnaError::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, QnaError>;
