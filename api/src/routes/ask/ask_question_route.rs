//! POST /api/ask: submits a question to the caller's session.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::ask::ask_request::{AskRequest, AskResponse},
    session::{SessionView, Submission, session_cookie},
};

/// Handler: POST /api/ask
///
/// Always answers 200: pipeline failures are part of the session view
/// (`error`), not an HTTP error.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8501/api/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What are the key characteristics of a manager?"}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AskRequest>,
) -> impl IntoResponse {
    let (id, submission, session) = submit_question(&state, &headers, &body.question).await;

    (
        [(header::SET_COOKIE, session_cookie(id))],
        Json(ApiResponse::success(AskResponse {
            submission,
            session,
        })),
    )
}

/// Resolves the caller's session and runs one submission while holding it.
pub(crate) async fn submit_question(
    state: &AppState,
    headers: &HeaderMap,
    question: &str,
) -> (Uuid, Submission, SessionView) {
    let (id, shared) = state.sessions.resolve(headers).await;
    let mut session = shared.lock().await;

    let submission = state.controller.submit(&mut session, question).await;
    debug!(session = %id, ?submission, "submission processed");

    (id, submission, session.view())
}
