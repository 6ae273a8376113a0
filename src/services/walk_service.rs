//! Hosted walks: per-canvas serialization, blocking workers and paint streaming.

use color_walk::{
    Canvas, CancelFlag, CancellationChecker, GridWalker, Paint, WalkError, WalkOutcome, WalkStats,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{AppConfig, CanvasSpec};
use crate::rendering::render_canvas;

/// How a hosted walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalkStatus {
    Completed,
    Cancelled,
}

/// Summary of one walk, reported by the API, the CLI and the logs
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WalkSummary {
    pub canvas: String,
    pub seed: u64,
    pub status: WalkStatus,
    /// Cells painted
    pub painted: usize,
    /// Steps that moved to an adjacent cell
    pub neighbor_steps: usize,
    /// Steps that fell back to the global scan
    pub fallback_steps: usize,
    /// Share of steps that fell back to the global scan
    pub fallback_ratio: f64,
    /// Mean squared color distance between consecutive paints
    pub mean_distance_sq: f64,
    pub elapsed_ms: u64,
}

impl WalkSummary {
    fn new(spec: &CanvasSpec, outcome: WalkOutcome, stats: &WalkStats, elapsed: Duration) -> Self {
        Self {
            canvas: spec.name.clone(),
            seed: spec.seed,
            status: if outcome.is_completed() {
                WalkStatus::Completed
            } else {
                WalkStatus::Cancelled
            },
            painted: outcome.painted(),
            neighbor_steps: stats.neighbor_steps,
            fallback_steps: stats.fallback_steps,
            fallback_ratio: stats.fallback_ratio(),
            mean_distance_sq: stats.mean_distance_sq(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    fn log(&self) {
        tracing::info!(
            canvas = %self.canvas,
            seed = self.seed,
            status = ?self.status,
            painted = self.painted,
            fallback_steps = self.fallback_steps,
            fallback_ratio = self.fallback_ratio,
            elapsed_ms = self.elapsed_ms,
            "Walk finished"
        );
    }
}

/// First event of a streamed walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WalkStart {
    pub canvas: String,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub cells: u64,
}

impl From<&CanvasSpec> for WalkStart {
    fn from(spec: &CanvasSpec) -> Self {
        Self {
            canvas: spec.name.clone(),
            seed: spec.seed,
            width: spec.width(),
            height: spec.height(),
            cells: spec.cell_count(),
        }
    }
}

/// One paint on the wire: `[x, y, r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaintRecord(pub u32, pub u32, pub u8, pub u8, pub u8);

impl From<Paint> for PaintRecord {
    fn from(paint: Paint) -> Self {
        let [r, g, b] = paint.color.to_bytes();
        Self(paint.position.x, paint.position.y, r, g, b)
    }
}

/// Events of a streamed walk, in order: one `Start`, any number of
/// `Paint` batches, then `Done` or `Error`
#[derive(Debug, Clone, PartialEq)]
pub enum WalkEvent {
    Start(WalkStart),
    Paint(Vec<PaintRecord>),
    Done(WalkSummary),
    Error(String),
}

/// A rendered walk
#[derive(Debug, Clone)]
pub struct RenderedWalk {
    pub png_bytes: Vec<u8>,
    pub summary: WalkSummary,
}

/// Cancels a streamed walk once the receiving side is gone.
struct ReceiverGone<'a>(&'a mpsc::UnboundedSender<WalkEvent>);

impl CancellationChecker for ReceiverGone<'_> {
    fn is_cancelled(&self) -> bool {
        self.0.is_closed()
    }
}

/// Cancels the flag when dropped, e.g. when a request future is abandoned.
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Counts a walk as running until dropped.
struct ActiveWalk(Arc<AtomicUsize>);

impl ActiveWalk {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for ActiveWalk {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Run a walk to completion on a fresh [`Canvas`].
///
/// Blocking; call from a worker thread in async contexts.
pub fn paint_canvas<C>(spec: &CanvasSpec, cancel: &C) -> Result<(Canvas, WalkSummary), WalkError>
where
    C: CancellationChecker + ?Sized,
{
    let started = Instant::now();
    let mut walker = GridWalker::from_config(&spec.walk)?;
    let mut canvas = Canvas::new(spec.width(), spec.height());

    tracing::debug!(canvas = %spec.name, seed = spec.seed, cells = spec.cell_count(), "Walk started");
    let outcome = walker.run_until(cancel, |paint| {
        if let Err(e) = canvas.paint(paint) {
            tracing::error!(canvas = %spec.name, %e, "Walk emitted an invalid paint");
        }
    })?;

    let summary = WalkSummary::new(spec, outcome, walker.stats(), started.elapsed());
    summary.log();
    Ok((canvas, summary))
}

/// Run a walk, sending paints to `tx` in batches of `spec.chunk_size`.
///
/// Stops early once the receiver is dropped.
fn stream_walk(
    spec: &CanvasSpec,
    tx: &mpsc::UnboundedSender<WalkEvent>,
) -> Result<WalkSummary, WalkError> {
    let started = Instant::now();
    let mut walker = GridWalker::from_config(&spec.walk)?;
    let chunk_size = spec.chunk_size;
    let mut batch = Vec::with_capacity(chunk_size);

    tracing::debug!(canvas = %spec.name, seed = spec.seed, chunk_size, "Streamed walk started");
    let outcome = walker.run_until(&ReceiverGone(tx), |paint| {
        batch.push(PaintRecord::from(paint));
        if batch.len() >= chunk_size {
            let full = std::mem::replace(&mut batch, Vec::with_capacity(chunk_size));
            // A failed send means the receiver is gone; the next poll cancels.
            let _ = tx.send(WalkEvent::Paint(full));
        }
    });
    if !batch.is_empty() {
        let _ = tx.send(WalkEvent::Paint(batch));
    }

    let summary = WalkSummary::new(spec, outcome?, walker.stats(), started.elapsed());
    summary.log();
    Ok(summary)
}

/// Runs walks for the configured canvases, at most one per canvas at a time
pub struct WalkService {
    config: Arc<AppConfig>,
    locks: HashMap<String, Arc<Mutex<()>>>,
    active: Arc<AtomicUsize>,
    optimize_png: bool,
}

impl WalkService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let locks = config
            .canvases
            .keys()
            .map(|name| (name.clone(), Arc::new(Mutex::new(()))))
            .collect();
        Self {
            config,
            locks,
            active: Arc::new(AtomicUsize::new(0)),
            optimize_png: false,
        }
    }

    /// Re-compress rendered PNGs with oxipng
    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Look up and validate a canvas for one run
    pub fn resolve(&self, name: &str, seed: Option<u64>) -> Result<CanvasSpec, ApiError> {
        let canvas = self
            .config
            .canvas(name)
            .ok_or_else(|| ApiError::CanvasNotFound(name.to_string()))?;
        CanvasSpec::resolve(name, canvas, seed)
    }

    /// Number of walks whose worker has not finished yet
    pub fn active_walks(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn lock_for(&self, name: &str) -> Result<Arc<Mutex<()>>, ApiError> {
        self.locks
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::CanvasNotFound(name.to_string()))
    }

    /// Walk a canvas and encode the result as PNG.
    ///
    /// Waits for any running walk on the same canvas. Dropping the returned
    /// future cancels the walk; the canvas stays locked until the worker
    /// has stopped.
    pub async fn render(&self, spec: CanvasSpec) -> Result<RenderedWalk, ApiError> {
        let lock = self.lock_for(&spec.name)?;
        let guard = lock.lock_owned().await;
        let active = ActiveWalk::enter(&self.active);

        let flag = CancelFlag::new();
        let _cancel_on_drop = CancelOnDrop(flag.clone());
        let optimize = self.optimize_png;

        tokio::task::spawn_blocking(move || -> Result<RenderedWalk, ApiError> {
            // Locals drop in reverse: the walk counts as finished before
            // the canvas unlocks.
            let _guard = guard;
            let _active = active;
            let (canvas, summary) =
                paint_canvas(&spec, &flag).map_err(|e| ApiError::from_walk(&spec.name, e))?;
            let png_bytes = render_canvas(&canvas, optimize)?;
            Ok(RenderedWalk { png_bytes, summary })
        })
        .await?
    }

    /// Start a streamed walk and return its event channel.
    ///
    /// The walk starts once no other walk runs on the canvas; `Start` is
    /// sent at that point. Dropping the receiver cancels the walk.
    pub fn stream(&self, spec: CanvasSpec) -> Result<mpsc::UnboundedReceiver<WalkEvent>, ApiError> {
        let lock = self.lock_for(&spec.name)?;
        let active = self.active.clone();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let _guard = lock.lock_owned().await;
            let _ = tx.send(WalkEvent::Start(WalkStart::from(&spec)));

            let name = spec.name.clone();
            let running = ActiveWalk::enter(&active);
            let result = tokio::task::spawn_blocking(move || {
                let _running = running;
                let result = stream_walk(&spec, &tx);
                (result, tx)
            })
            .await;

            match result {
                Ok((Ok(summary), tx)) => {
                    let _ = tx.send(WalkEvent::Done(summary));
                }
                Ok((Err(e), tx)) => {
                    tracing::warn!(canvas = %name, %e, "Streamed walk failed");
                    let _ = tx.send(WalkEvent::Error(e.to_string()));
                }
                Err(e) => {
                    tracing::error!(canvas = %name, %e, "Streamed walk task failed");
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanvasConfig, NeighborPolicySetting, ScanOrderSetting};
    use color_walk::NeverCancel;
    use std::collections::{BTreeMap, HashSet};

    fn canvas(width: u32, height: u32, levels: u32, chunk_size: usize) -> CanvasConfig {
        CanvasConfig {
            width,
            height,
            levels,
            similarity_tolerance: 500,
            neighbor_policy: NeighborPolicySetting::Random,
            scan_order: ScanOrderSetting::ColumnMajor,
            seed: None,
            chunk_size,
        }
    }

    fn service() -> WalkService {
        let mut canvases = BTreeMap::new();
        canvases.insert("tiny".to_string(), canvas(4, 2, 2, 3));
        canvases.insert("small".to_string(), canvas(8, 8, 4, 16));
        canvases.insert("large".to_string(), canvas(512, 512, 64, 1024));
        WalkService::new(Arc::new(AppConfig {
            canvases,
            default_canvas: Some("tiny".to_string()),
            optimize_png: false,
            render_cache_capacity: 4,
        }))
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<WalkEvent>) -> Vec<WalkEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_paint_canvas_completes() {
        let spec = service().resolve("small", Some(5)).unwrap();
        let (canvas, summary) = paint_canvas(&spec, &NeverCancel).unwrap();

        assert!(canvas.is_complete());
        assert_eq!(summary.status, WalkStatus::Completed);
        assert_eq!(summary.painted, 64);
        assert_eq!(summary.neighbor_steps + summary.fallback_steps, 63);
        assert_eq!(summary.seed, 5);
    }

    #[test]
    fn test_paint_canvas_cancelled() {
        let spec = service().resolve("small", Some(5)).unwrap();
        let flag = CancelFlag::new();
        flag.cancel();

        let (canvas, summary) = paint_canvas(&spec, &flag).unwrap();
        assert_eq!(summary.status, WalkStatus::Cancelled);
        assert_eq!(summary.painted, 0);
        assert_eq!(canvas.painted_count(), 0);
    }

    #[test]
    fn test_resolve_unknown_canvas() {
        assert!(matches!(
            service().resolve("mural", None),
            Err(ApiError::CanvasNotFound(name)) if name == "mural"
        ));
    }

    #[test]
    fn test_paint_record_layout() {
        let paint = Paint {
            position: color_walk::Position::new(3, 1),
            color: color_walk::Color::new(10, 20, 30),
        };
        let record = PaintRecord::from(paint);
        assert_eq!(serde_json::to_string(&record).unwrap(), "[3,1,10,20,30]");
    }

    #[tokio::test]
    async fn test_render_returns_png() {
        let service = service();
        let spec = service.resolve("tiny", Some(1)).unwrap();
        let rendered = service.render(spec).await.unwrap();

        assert_eq!(&rendered.png_bytes[..4], b"\x89PNG");
        assert_eq!(rendered.summary.painted, 8);
    }

    #[tokio::test]
    async fn test_stream_emits_start_batches_done() {
        let service = service();
        let spec = service.resolve("tiny", Some(4)).unwrap();
        let events = drain(service.stream(spec).unwrap()).await;

        assert!(matches!(&events[0], WalkEvent::Start(start) if start.cells == 8));
        let batches: Vec<&Vec<PaintRecord>> = events
            .iter()
            .filter_map(|e| match e {
                WalkEvent::Paint(batch) => Some(batch),
                _ => None,
            })
            .collect();
        // chunk_size 3 over 8 cells
        assert_eq!(
            batches.iter().map(|b| b.len()).collect::<Vec<_>>(),
            vec![3, 3, 2]
        );
        let cells: HashSet<(u32, u32)> = batches.iter().flat_map(|b| b.iter()).map(|p| (p.0, p.1)).collect();
        assert_eq!(cells.len(), 8);

        match events.last() {
            Some(WalkEvent::Done(summary)) => {
                assert_eq!(summary.status, WalkStatus::Completed);
                assert_eq!(summary.painted, 8);
            }
            other => panic!("Expected Done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_matches_render_for_same_seed() {
        let service = service();
        let events = drain(service.stream(service.resolve("small", Some(8)).unwrap()).unwrap()).await;
        let (canvas, _) = paint_canvas(&service.resolve("small", Some(8)).unwrap(), &NeverCancel).unwrap();

        let mut streamed = Canvas::new(8, 8);
        for event in &events {
            if let WalkEvent::Paint(batch) = event {
                for &PaintRecord(x, y, r, g, b) in batch {
                    streamed
                        .paint(Paint {
                            position: color_walk::Position::new(x, y),
                            color: color_walk::Color::new(r, g, b),
                        })
                        .unwrap();
                }
            }
        }
        assert_eq!(streamed.to_rgb(), canvas.to_rgb());
    }

    #[test]
    fn test_dropped_receiver_cancels_walk() {
        let spec = service().resolve("small", Some(2)).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let summary = stream_walk(&spec, &tx).unwrap();
        assert_eq!(summary.status, WalkStatus::Cancelled);
        assert_eq!(summary.painted, 0);
    }

    #[tokio::test]
    async fn test_walks_on_one_canvas_are_serialized() {
        let service = service();
        let lock = service.lock_for("tiny").unwrap();
        let guard = lock.lock().await;

        let mut rx = service.stream(service.resolve("tiny", Some(1)).unwrap()).unwrap();
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err(), "walk started while canvas was busy");

        drop(guard);
        assert!(matches!(rx.recv().await, Some(WalkEvent::Start(_))));
    }

    #[tokio::test]
    async fn test_abandoned_render_keeps_canvas_locked_until_worker_stops() {
        let service = Arc::new(service());
        let spec = service.resolve("large", Some(3)).unwrap();

        let task = {
            let service = service.clone();
            tokio::spawn(async move { service.render(spec).await })
        };
        tokio::time::timeout(Duration::from_secs(10), async {
            while service.active_walks() == 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("render never started");

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let lock = service.lock_for("large").unwrap();
        let _guard = lock.lock().await;
        assert_eq!(service.active_walks(), 0, "canvas unlocked while a worker ran");
    }

    #[tokio::test]
    async fn test_finished_walks_are_not_counted() {
        let service = service();
        service
            .render(service.resolve("tiny", Some(1)).unwrap())
            .await
            .unwrap();
        drain(service.stream(service.resolve("tiny", Some(1)).unwrap()).unwrap()).await;
        assert_eq!(service.active_walks(), 0);
    }
}
