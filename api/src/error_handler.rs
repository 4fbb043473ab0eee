use qna_chain::QnaError;
use thiserror::Error;

/// Errors that stop the server from starting or running.
///
/// Per-request failures never surface here: pipeline errors are shown in
/// the session, malformed bodies are wrapped by
/// [`crate::middleware_layer::json_extractor::json_error_mapper`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid API_ADDRESS '{0}'")]
    Address(String),

    /// Pipeline construction failed (bad config, unreachable backend,
    /// missing index).
    #[error(transparent)]
    Startup(#[from] QnaError),

    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),
}

impl AppError {
    /// Suggested process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Startup(QnaError::MissingIndex { .. }) => 3,
            AppError::Address(_) => 2,
            AppError::Startup(e) if e.is_fatal() => 2,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
