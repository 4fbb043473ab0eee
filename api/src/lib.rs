//! Web front end for the Q&A pipelines: HTML page, JSON API and health.

use std::{env, net::SocketAddr, sync::Arc};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;
pub mod session;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use qna_chain::{QnaSettings, build_runtime};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        ask::{ask_question_route::ask_question, session_route::get_session},
        health::health_route::health,
        page::page_route::{ask_form, index},
    },
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8501";

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask_form))
        .route("/api/ask", post(ask_question))
        .route("/api/session", get(get_session))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves configuration, builds the pipelines, and serves until Ctrl+C.
///
/// Construction failures (including a missing index) are returned before
/// the listener is bound.
pub async fn start() -> AppResult<()> {
    let address = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| AppError::Address(address.clone()))?;

    let settings = QnaSettings::from_env()?;
    let runtime = build_runtime(&settings).await?;
    let app = router(Arc::new(AppState::new(runtime)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: address.clone(),
            source,
        })?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
