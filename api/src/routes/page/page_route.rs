//! GET / and POST /ask: the browser-facing page.

use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect},
};

use crate::{
    core::app_state::AppState,
    routes::{
        ask::{ask_question_route::submit_question, ask_request::AskRequest},
        page::page_render::render_page,
    },
    session::session_cookie,
};

/// Handler: GET /
///
/// Read-only: a client without a session sees the idle page and gets no
/// cookie until it asks something.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    Html(render_page(&state.sessions.view(&headers).await))
}

/// Handler: POST /ask (form field `question`)
///
/// Post/redirect/get: the result is rendered by the following `GET /`.
pub async fn ask_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AskRequest>,
) -> impl IntoResponse {
    let (id, _, _) = submit_question(&state, &headers, &form.question).await;

    (
        [(header::SET_COOKIE, session_cookie(id))],
        Redirect::to("/"),
    )
}
