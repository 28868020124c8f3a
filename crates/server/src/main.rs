use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use shared::protocol::{HEALTH_PATH, QUERY_PATH};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

mod api;
mod app_state;
mod config;

use app_state::AppState;
use config::{load_fixture, load_settings};

const MAX_REQUEST_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let fixture = load_fixture(&settings)?;
    info!(
        fixture = settings.fixture_path.as_deref().unwrap_or("<built-in>"),
        delay_ms = settings.response_delay_ms,
        failure_trigger = settings.failure_trigger.as_deref().unwrap_or("<none>"),
        "query stub configured"
    );

    let state = AppState {
        fixture,
        response_delay: settings.response_delay(),
        failure_trigger: settings.failure_trigger.clone(),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "query stub listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route(HEALTH_PATH, get(api::health))
        .route(QUERY_PATH, post(api::query))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .with_state(state)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
