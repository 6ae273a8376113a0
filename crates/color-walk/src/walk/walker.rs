//! The grid walker state machine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cancellation::{CancellationChecker, NeverCancel};
use super::options::{NeighborPolicy, WalkOptions};
use super::stats::WalkStats;
use crate::api::{ConfigError, ExhaustionError, WalkConfig};
use crate::color::Color;
use crate::grid::{Position, ScanOrder, UnpaintedSet};
use crate::palette::Palette;

/// One emitted cell: where to paint and with what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Paint {
    pub position: Position,
    pub color: Color,
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The palette ran out; every color has been painted.
    Completed { painted: usize },
    /// A cancellation checker stopped the walk early.
    Cancelled { painted: usize },
}

impl WalkOutcome {
    /// Cells painted during the walk.
    pub fn painted(&self) -> usize {
        match *self {
            WalkOutcome::Completed { painted } | WalkOutcome::Cancelled { painted } => painted,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WalkOutcome::Completed { .. })
    }
}

/// Arg-min over sampled palette indices by squared distance to `target`.
///
/// Ties keep the earliest sample. Returns `None` for an empty sample.
///
/// # Panics
///
/// Panics if a sampled index is out of range.
pub fn nearest_sampled<I>(colors: &[Color], target: Color, samples: I) -> Option<(usize, u32)>
where
    I: IntoIterator<Item = usize>,
{
    let mut best: Option<(usize, u32)> = None;
    for index in samples {
        let distance = colors[index].distance_sq(target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best
}

/// Walks a pixel grid, painting every cell with a unique palette color.
///
/// The walker owns the [`UnpaintedSet`], the shrinking [`Palette`] and its
/// random source, so independent walkers never share state. Each step:
///
/// 1. picks an unpainted neighbor of the last painted cell, or the first
///    unpainted cell of a global scan when the neighborhood is full, and
///    marks it painted;
/// 2. samples up to `similarity_tolerance` palette colors and takes the one
///    closest to the last painted color out of the palette.
///
/// The first step instead picks a uniformly random cell and color.
///
/// # Example
///
/// ```
/// use color_walk::{GridWalker, Palette};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let palette = Palette::generate(2).unwrap();
/// let mut walker = GridWalker::new(4, 2, palette, StdRng::seed_from_u64(7));
///
/// let mut painted = Vec::new();
/// let outcome = walker.run(|paint| painted.push(paint)).unwrap();
///
/// assert!(outcome.is_completed());
/// assert_eq!(painted.len(), 8);
/// ```
#[derive(Debug)]
pub struct GridWalker<R = StdRng> {
    unpainted: UnpaintedSet,
    palette: Palette,
    rng: R,
    options: WalkOptions,
    cursor: Option<Paint>,
    stats: WalkStats,
    cancelled: bool,
    /// Reused buffer for neighborhood candidates.
    candidates: Vec<Position>,
}

impl GridWalker<StdRng> {
    /// Validate `config` and set up a walker with a fresh palette.
    ///
    /// The random source is seeded from `config.seed` when present, so equal
    /// configs produce identical walks.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] reported by [`WalkConfig::validate()`].
    pub fn from_config(config: &WalkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = Palette::generate(config.levels)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let walker = Self::new(config.width, config.height, palette, rng);
        Ok(walker.with_options(config.options.clone()))
    }
}

impl<R: Rng> GridWalker<R> {
    /// Create a walker over a `width` x `height` grid.
    ///
    /// No sizing check is done here: a palette larger than the grid ends in
    /// an [`ExhaustionError`], a smaller one leaves cells unpainted.
    pub fn new(width: u32, height: u32, palette: Palette, rng: R) -> Self {
        Self {
            unpainted: UnpaintedSet::new(width, height),
            palette,
            rng,
            options: WalkOptions::default(),
            cursor: None,
            stats: WalkStats::default(),
            cancelled: false,
            candidates: Vec::with_capacity(8),
        }
    }

    #[inline]
    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn similarity_tolerance(mut self, tolerance: usize) -> Self {
        self.options.similarity_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn neighbor_policy(mut self, policy: NeighborPolicy) -> Self {
        self.options.neighbor_policy = policy;
        self
    }

    #[inline]
    pub fn scan_order(mut self, order: ScanOrder) -> Self {
        self.options.scan_order = order;
        self
    }

    #[inline]
    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn unpainted(&self) -> &UnpaintedSet {
        &self.unpainted
    }

    /// Direct access to the fill bitmap, e.g. to pre-paint cells.
    #[inline]
    pub fn unpainted_mut(&mut self) -> &mut UnpaintedSet {
        &mut self.unpainted
    }

    /// The last emitted paint.
    #[inline]
    pub fn cursor(&self) -> Option<Paint> {
        self.cursor
    }

    #[inline]
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Whether the walk has nothing left to do.
    pub fn is_finished(&self) -> bool {
        self.cancelled || self.palette.is_empty()
    }

    /// Whether a cancellation checker stopped this walk.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Advance the walk by one cell.
    ///
    /// Returns `Ok(None)` once the palette is empty or the walk was
    /// cancelled. Interleaving `step` calls with other work does not change
    /// the sequence of paints.
    ///
    /// # Errors
    ///
    /// [`ExhaustionError`] if colors remain but every cell is painted.
    pub fn step(&mut self) -> Result<Option<Paint>, ExhaustionError> {
        if self.is_finished() {
            return Ok(None);
        }

        let paint = match self.cursor {
            None => self.start()?,
            Some(cursor) => {
                let position = self.select_next_position(cursor.position)?;
                let color = self.take_similar(cursor.color);
                Paint { position, color }
            }
        };

        self.stats.steps += 1;
        self.cursor = Some(paint);
        Ok(Some(paint))
    }

    /// Run the walk to completion, calling `on_paint` once per cell.
    ///
    /// # Errors
    ///
    /// [`ExhaustionError`] if colors remain but every cell is painted.
    pub fn run<F>(&mut self, on_paint: F) -> Result<WalkOutcome, ExhaustionError>
    where
        F: FnMut(Paint),
    {
        self.run_until(&NeverCancel, on_paint)
    }

    /// Run the walk, polling `cancel` before every step.
    ///
    /// A cancelled walker stays cancelled: later calls paint nothing and
    /// report [`WalkOutcome::Cancelled`].
    pub fn run_until<C, F>(
        &mut self,
        cancel: &C,
        mut on_paint: F,
    ) -> Result<WalkOutcome, ExhaustionError>
    where
        C: CancellationChecker + ?Sized,
        F: FnMut(Paint),
    {
        loop {
            if !self.cancelled && cancel.is_cancelled() {
                self.cancelled = true;
            }
            if self.cancelled {
                return Ok(WalkOutcome::Cancelled {
                    painted: self.stats.steps,
                });
            }
            match self.step()? {
                Some(paint) => on_paint(paint),
                None => {
                    return Ok(WalkOutcome::Completed {
                        painted: self.stats.steps,
                    })
                }
            }
        }
    }

    /// Choose and claim the next cell after `cursor`.
    ///
    /// Unpainted cells of the 8-neighborhood are preferred, picked by the
    /// configured [`NeighborPolicy`]. Without one, the first unpainted cell
    /// of a global scan in [`ScanOrder`] is taken. The returned cell is
    /// already marked painted.
    ///
    /// # Errors
    ///
    /// [`ExhaustionError`] if no cell on the grid is unpainted.
    pub fn select_next_position(&mut self, cursor: Position) -> Result<Position, ExhaustionError> {
        self.candidates.clear();
        self.unpainted
            .unpainted_neighbors(cursor, &mut self.candidates);

        let neighbor = match self.options.neighbor_policy {
            _ if self.candidates.is_empty() => None,
            NeighborPolicy::Random => {
                let pick = self.rng.gen_range(0..self.candidates.len());
                Some(self.candidates[pick])
            }
            NeighborPolicy::First => Some(self.candidates[0]),
        };

        let position = match neighbor {
            Some(position) => {
                self.stats.neighbor_steps += 1;
                position
            }
            None => {
                let position = self
                    .unpainted
                    .first_unpainted(self.options.scan_order)
                    .ok_or(ExhaustionError {
                        remaining_colors: self.palette.len(),
                    })?;
                self.stats.fallback_steps += 1;
                position
            }
        };

        self.unpainted.mark_painted(position);
        Ok(position)
    }

    /// Remove and return a palette color close to `current`.
    ///
    /// Samples `min(similarity_tolerance, palette.len())` random indices,
    /// with replacement, and keeps the nearest by squared distance. Returns
    /// `None` if the palette is empty.
    pub fn select_similar_color(&mut self, current: Color) -> Option<Color> {
        if self.palette.is_empty() {
            return None;
        }
        Some(self.take_similar(current))
    }

    /// Caller guarantees a non-empty palette.
    fn take_similar(&mut self, current: Color) -> Color {
        let len = self.palette.len();
        let samples = self.options.similarity_tolerance.clamp(1, len);
        let rng = &mut self.rng;
        let (index, distance) = nearest_sampled(
            self.palette.colors(),
            current,
            (0..samples).map(|_| rng.gen_range(0..len)),
        )
        .unwrap_or((0, 0));
        self.stats.total_distance_sq += distance as u64;
        self.palette.take(index)
    }

    /// Random start cell and color.
    fn start(&mut self) -> Result<Paint, ExhaustionError> {
        let exhausted = ExhaustionError {
            remaining_colors: self.palette.len(),
        };
        if self.unpainted.is_exhausted() {
            return Err(exhausted);
        }

        let candidate = Position::new(
            self.rng.gen_range(0..self.unpainted.width()),
            self.rng.gen_range(0..self.unpainted.height()),
        );
        // Only pre-painted grids can land on a claimed cell.
        let position = if self.unpainted.is_unpainted(candidate) {
            candidate
        } else {
            self.unpainted
                .first_unpainted(self.options.scan_order)
                .ok_or(exhausted)?
        };
        self.unpainted.mark_painted(position);

        let index = self.rng.gen_range(0..self.palette.len());
        let color = self.palette.take(index);
        Ok(Paint { position, color })
    }
}
