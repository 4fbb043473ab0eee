use ai_llm_service::health_service::HealthStatus;
use serde::Serialize;

/// Response payload for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// True when every probe below succeeded.
    pub ok: bool,
    /// Active answer cache mode (`disabled`, `exact`, `semantic`).
    pub cache: String,
    /// One entry per distinct LLM profile.
    pub llm: Vec<HealthStatus>,
    /// The document index.
    pub index: HealthStatus,
}
