use std::process::ExitCode;

use ai_llm_service::telemetry;
use tracing::{Level, error, warn};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the environment alone is enough.
    let dotenv = dotenvy::dotenv();

    let global_fmt = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(filter::filter_fn(|meta| {
            !meta.target().starts_with(telemetry::TARGET_PREFIX)
        }));

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(global_fmt)
        .with(telemetry::layer())
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    match api::start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "qna-app failed");
            ExitCode::from(e.exit_code())
        }
    }
}
