//! The grid walk
//!
//! [`GridWalker`] drives the fill: neighbor-first cell selection with a
//! global fallback scan, and tolerance-bounded random sampling for the next
//! color. [`walk`] is a shortcut for a one-shot run with an OS-seeded
//! random source.

mod cancellation;
mod options;
mod stats;
mod walker;

pub use cancellation::{CancelFlag, CancellationChecker, NeverCancel};
pub use options::{NeighborPolicy, WalkOptions, DEFAULT_SIMILARITY_TOLERANCE};
pub use stats::WalkStats;
pub use walker::{nearest_sampled, GridWalker, Paint, WalkOutcome};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::ExhaustionError;
use crate::palette::Palette;

/// Paint a `width` x `height` grid from `palette` with default options.
///
/// `on_paint` is called once per cell in visiting order.
///
/// # Errors
///
/// [`ExhaustionError`] if the palette has more colors than the grid has
/// cells.
///
/// # Example
///
/// ```
/// use color_walk::{walk, Canvas, ExhaustionError, Palette, WalkOutcome};
///
/// let mut canvas = Canvas::new(4, 2);
/// let outcome = walk(4, 2, Palette::generate(2).unwrap(), |paint| {
///     canvas.paint(paint).unwrap()
/// });
/// assert_eq!(outcome, Ok(WalkOutcome::Completed { painted: 8 }));
/// assert!(canvas.is_complete());
///
/// // 27 colors do not fit on 8 cells
/// let outcome = walk(4, 2, Palette::generate(3).unwrap(), |_| {});
/// assert_eq!(outcome, Err(ExhaustionError { remaining_colors: 19 }));
/// ```
pub fn walk<F>(
    width: u32,
    height: u32,
    palette: Palette,
    on_paint: F,
) -> Result<WalkOutcome, ExhaustionError>
where
    F: FnMut(Paint),
{
    GridWalker::new(width, height, palette, StdRng::from_entropy()).run(on_paint)
}
