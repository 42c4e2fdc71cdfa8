//! Application setup and initialization
//!
//! All application wiring lives here rather than in main.rs so the
//! integration tests can build the exact router the binary serves.

pub mod server;

use crate::handlers;
use crate::middleware::accept_header_middleware;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::routing::{any, get};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use vario_core::Config;
use vario_storage::{create_uploader, StagingStore};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    let staging = StagingStore::new(&config.staging_path)
        .await
        .context("Failed to initialize staging store")?;

    let uploader = create_uploader(&config)
        .await
        .context("Failed to initialize storage backend")?;

    let state = Arc::new(AppState {
        config,
        staging,
        uploader,
    });

    let router = build_router(state.clone());

    Ok((state, router))
}

/// Build the router: the upload endpoint accepts any method on any path,
/// and every response carries the `Accept` allow-list header.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/", any(handlers::upload::upload))
        .route("/{*path}", any(handlers::upload::upload))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            accept_header_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
