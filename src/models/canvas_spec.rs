use color_walk::WalkConfig;

use crate::error::ApiError;
use crate::models::CanvasConfig;

/// Largest canvas the server will walk: a 128-level palette.
pub const MAX_CANVAS_CELLS: u64 = 1 << 21;

/// A canvas resolved for one run: validated walk parameters and a concrete seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSpec {
    pub name: String,
    pub walk: WalkConfig,
    pub seed: u64,
    /// The seed came from the request or the config rather than the OS
    pub seed_pinned: bool,
    pub chunk_size: usize,
}

impl CanvasSpec {
    /// Resolve `canvas` for a run.
    ///
    /// The seed is taken from `seed`, then from the canvas config, and is
    /// drawn at random otherwise.
    pub fn resolve(name: &str, canvas: &CanvasConfig, seed: Option<u64>) -> Result<Self, ApiError> {
        let (seed, seed_pinned) = match seed.or(canvas.seed) {
            Some(seed) => (seed, true),
            None => (rand::random(), false),
        };

        let walk = canvas.walk_config(seed);
        walk.validate().map_err(|source| ApiError::InvalidCanvas {
            name: name.to_string(),
            source,
        })?;

        let cells = walk.cell_count();
        if cells > MAX_CANVAS_CELLS {
            return Err(ApiError::CanvasTooLarge {
                name: name.to_string(),
                cells,
                max: MAX_CANVAS_CELLS,
            });
        }

        Ok(Self {
            name: name.to_string(),
            walk,
            seed,
            seed_pinned,
            chunk_size: canvas.chunk_size.max(1),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.walk.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.walk.height
    }

    #[inline]
    pub fn cell_count(&self) -> u64 {
        self.walk.cell_count()
    }
}
