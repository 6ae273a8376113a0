pub mod render_cache;
pub mod walk_service;

pub use render_cache::{CachedRender, RenderCache, DEFAULT_RENDER_CACHE_CAPACITY};
pub use walk_service::{
    paint_canvas, PaintRecord, RenderedWalk, WalkEvent, WalkService, WalkStart, WalkStatus,
    WalkSummary,
};
