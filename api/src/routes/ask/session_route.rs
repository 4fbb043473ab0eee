//! GET /api/session: current view of the caller's session.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

/// Handler: GET /api/session
///
/// Never creates a session; unknown callers see an idle view.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    Json(ApiResponse::success(state.sessions.view(&headers).await))
}
