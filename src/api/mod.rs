// src/api/mod.rs — Usage sync endpoint shared across sessions and devices

pub mod auth;
pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::infra::config::ServerConfig;
use crate::usage::UsageLogStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub journal: Arc<UsageLogStore>,
    pub token: Option<String>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/usage-patterns", get(handlers::get_usage_patterns))
        .route("/api/usage-events", post(handlers::post_usage_event))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the configured port (runs until the process exits).
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let router = build_router(state);

    tracing::info!("Usage sync endpoint listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
