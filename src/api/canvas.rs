use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use chrono::{DateTime, Utc};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{CanvasSpec, NeighborPolicySetting, ScanOrderSetting};
use crate::services::{CachedRender, RenderCache, WalkEvent, WalkService};

/// Response header carrying the seed a walk ran with
pub const SEED_HEADER: HeaderName = HeaderName::from_static("x-walk-seed");

/// Query parameters for image and stream endpoints
#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    /// Seed for the walk; overrides the canvas seed
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A configured canvas
#[derive(Debug, Serialize, ToSchema)]
pub struct CanvasInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub levels: u32,
    /// Palette size, `levels^3`
    pub colors: u64,
    pub similarity_tolerance: usize,
    pub neighbor_policy: NeighborPolicySetting,
    pub scan_order: ScanOrderSetting,
    pub seed: Option<u64>,
    pub chunk_size: usize,
    /// Whether the canvas can be walked
    pub valid: bool,
    /// Why the canvas cannot be walked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response from /api/canvases
#[derive(Debug, Serialize, ToSchema)]
pub struct CanvasListResponse {
    pub canvases: Vec<CanvasInfo>,
    pub default_canvas: Option<String>,
}

/// List configured canvases
#[utoipa::path(
    get,
    path = "/api/canvases",
    responses(
        (status = 200, description = "Configured canvases", body = CanvasListResponse),
    ),
    tag = "Canvas"
)]
pub async fn handle_list_canvases(
    State(walks): State<Arc<WalkService>>,
) -> Json<CanvasListResponse> {
    let config = walks.config();
    let canvases = config
        .canvases
        .iter()
        .map(|(name, canvas)| {
            // A fixed seed keeps validation free of randomness
            let error = CanvasSpec::resolve(name, canvas, Some(0))
                .err()
                .map(|e| e.to_string());
            CanvasInfo {
                name: name.clone(),
                width: canvas.width,
                height: canvas.height,
                levels: canvas.levels,
                colors: (canvas.levels as u64).pow(3),
                similarity_tolerance: canvas.similarity_tolerance,
                neighbor_policy: canvas.neighbor_policy,
                scan_order: canvas.scan_order,
                seed: canvas.seed,
                chunk_size: canvas.chunk_size,
                valid: error.is_none(),
                error,
            }
        })
        .collect();

    Json(CanvasListResponse {
        canvases,
        default_canvas: config.default_canvas.clone(),
    })
}

/// Render a canvas to PNG
///
/// Runs a complete walk and returns the painted canvas. Renders with a
/// fixed seed (from the query or the canvas config) are cached.
#[utoipa::path(
    get,
    path = "/api/canvas/{name}/image",
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 404, description = "Canvas not found"),
        (status = 422, description = "Canvas configuration is invalid"),
        (status = 500, description = "Walk or rendering error"),
    ),
    params(
        ("name" = String, Path, description = "Canvas name from config"),
        ("seed" = Option<u64>, Query, description = "Walk seed (default: canvas seed, else random)"),
    ),
    tag = "Canvas"
)]
pub async fn handle_canvas_image(
    State(walks): State<Arc<WalkService>>,
    State(cache): State<Arc<RenderCache>>,
    Path(name): Path<String>,
    Query(query): Query<SeedQuery>,
) -> Result<Response, ApiError> {
    let spec = walks.resolve(&name, query.seed)?;

    if spec.seed_pinned {
        if let Some(cached) = cache.get(&spec.name, spec.seed).await {
            tracing::debug!(canvas = %spec.name, seed = spec.seed, "Serving cached render");
            return Ok(png_response(
                cached.png_bytes,
                spec.seed,
                Some(cached.generated_at),
            ));
        }
    }

    let seed_pinned = spec.seed_pinned;
    let rendered = walks.render(spec).await?;
    let png_bytes = Bytes::from(rendered.png_bytes);
    let seed = rendered.summary.seed;

    if !seed_pinned {
        return Ok(png_response(png_bytes, seed, None));
    }

    let generated_at = Utc::now();
    let canvas = rendered.summary.canvas.clone();
    cache
        .store(
            &canvas,
            seed,
            CachedRender {
                png_bytes: png_bytes.clone(),
                summary: rendered.summary,
                generated_at,
            },
        )
        .await;

    Ok(png_response(png_bytes, seed, Some(generated_at)))
}

/// PNG response; pinned renders carry their generation time and may be cached
fn png_response(png_bytes: Bytes, seed: u64, generated_at: Option<DateTime<Utc>>) -> Response {
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, png_bytes.len().to_string()),
            (SEED_HEADER, seed.to_string()),
        ],
        png_bytes,
    )
        .into_response();

    let headers = response.headers_mut();
    match generated_at {
        Some(generated_at) => {
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            );
            let last_modified = generated_at
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string();
            if let Ok(value) = HeaderValue::from_str(&last_modified) {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }
        None => {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
    }
    response
}

/// Stream a walk as Server-Sent Events
///
/// Events: `start` (canvas, seed, dimensions), `paint` (batches of
/// `[x, y, r, g, b]`), then `done` (walk summary) or `error`. Closing the
/// connection cancels the walk.
#[utoipa::path(
    get,
    path = "/api/canvas/{name}/stream",
    responses(
        (status = 200, description = "Walk event stream", content_type = "text/event-stream"),
        (status = 404, description = "Canvas not found"),
        (status = 422, description = "Canvas configuration is invalid"),
    ),
    params(
        ("name" = String, Path, description = "Canvas name from config"),
        ("seed" = Option<u64>, Query, description = "Walk seed (default: canvas seed, else random)"),
    ),
    tag = "Canvas"
)]
pub async fn handle_canvas_stream(
    State(walks): State<Arc<WalkService>>,
    Path(name): Path<String>,
    Query(query): Query<SeedQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let spec = walks.resolve(&name, query.seed)?;
    let rx = walks.stream(spec)?;

    let stream =
        UnboundedReceiverStream::new(rx).map(|event| Ok::<_, Infallible>(to_sse_event(event)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: WalkEvent) -> Event {
    match event {
        WalkEvent::Start(start) => Event::default()
            .event("start")
            .data(serde_json::to_string(&start).unwrap_or_default()),
        WalkEvent::Paint(batch) => Event::default()
            .event("paint")
            .data(serde_json::to_string(&batch).unwrap_or_default()),
        WalkEvent::Done(summary) => Event::default()
            .event("done")
            .data(serde_json::to_string(&summary).unwrap_or_default()),
        WalkEvent::Error(message) => Event::default().event("error").data(message),
    }
}
