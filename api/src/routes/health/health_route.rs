//! GET /health: LLM providers and the document index.

use std::{sync::Arc, time::Instant};

use ai_llm_service::health_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};
use rag_store::VectorStore;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::health::health_response::HealthResponse,
};

/// Handler: GET /health
///
/// 200 when every probe is ok, 503 otherwise; the body is the same.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let (llm, index) = tokio::join!(state.llm.health_all(), index_health(state.store.as_ref()));

    let ok = index.ok && llm.iter().all(|s| s.ok);
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    ApiResponse::success(HealthResponse {
        ok,
        cache: state.cache_mode.to_string(),
        llm,
        index,
    })
    .into_response_with_status(status)
}

async fn index_health(store: &dyn VectorStore) -> HealthStatus {
    let started = Instant::now();
    let res = store.check_index().await;
    let latency_ms = started.elapsed().as_millis();

    let (ok, message) = match res {
        Ok(()) => (true, "index available".to_string()),
        Err(e) => (false, e.to_string()),
    };
    HealthStatus::new(
        "Qdrant",
        store.endpoint(),
        Some(store.index_name()),
        ok,
        latency_ms,
        message,
    )
}
