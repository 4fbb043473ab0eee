use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use llm_cache::CacheMode;
use qna_chain::QnaRuntime;
use rag_store::VectorStore;

use crate::session::{SessionController, SessionRegistry};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runs questions against both pipelines and updates sessions.
    pub controller: SessionController,
    /// Per-cookie session state.
    pub sessions: SessionRegistry,
    /// Provider clients, kept for health probes.
    pub llm: Arc<LlmServiceProfiles>,
    /// Vector store handle, kept for the index health check.
    pub store: Arc<dyn VectorStore>,
    pub cache_mode: CacheMode,
}

impl AppState {
    /// Wraps a fully built runtime; no I/O happens here.
    pub fn new(runtime: QnaRuntime) -> Self {
        Self {
            controller: SessionController::new(runtime.pipelines),
            sessions: SessionRegistry::new(),
            llm: runtime.llm,
            store: runtime.store,
            cache_mode: runtime.cache_mode,
        }
    }
}
