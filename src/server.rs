//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{Path, Query, State},
    http::{header::X_CONTENT_TYPE_OPTIONS, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api::{self, SeedQuery};
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{RenderCache, WalkService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub walks: Arc<WalkService>,
    pub render_cache: Arc<RenderCache>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    anyhow::ensure!(!config.canvases.is_empty(), "No canvases configured");
    Ok(app_state_from_config(config))
}

/// Create application state from an already loaded config.
pub fn app_state_from_config(config: Arc<AppConfig>) -> AppState {
    let walks =
        Arc::new(WalkService::new(config.clone()).with_png_optimization(config.optimize_png));
    let render_cache = Arc::new(RenderCache::with_capacity(config.render_cache_capacity));

    AppState {
        config,
        walks,
        render_cache,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Canvas API endpoints
        .route("/api/canvases", get(handle_list_canvases))
        .route("/api/canvas/:name/image", get(handle_canvas_image))
        .route("/api/canvas/:name/stream", get(handle_canvas_stream))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_list_canvases(State(state): State<AppState>) -> impl IntoResponse {
    api::handle_list_canvases(State(state.walks)).await
}

async fn handle_canvas_image(
    State(state): State<AppState>,
    path: Path<String>,
    query: Query<SeedQuery>,
) -> Result<Response, ApiError> {
    api::handle_canvas_image(
        State(state.walks),
        State(state.render_cache),
        path,
        query,
    )
    .await
}

async fn handle_canvas_stream(
    State(state): State<AppState>,
    path: Path<String>,
    query: Query<SeedQuery>,
) -> Result<Response, ApiError> {
    api::handle_canvas_stream(State(state.walks), path, query)
        .await
        .map(IntoResponse::into_response)
}
