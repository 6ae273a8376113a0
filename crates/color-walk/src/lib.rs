#![allow(clippy::module_inception)]

//! color-walk: fill a pixel grid with every color of an evenly sampled RGB cube
//!
//! The walk paints each cell of a `width` x `height` grid exactly once, using
//! each palette color exactly once. Consecutive cells are usually neighbors
//! and consecutive colors are usually close, which produces smooth, organic
//! color fields.
//!
//! # Quick Start
//!
//! [`WalkConfig`] validates the sizing, [`GridWalker`] does the work:
//!
//! ```
//! use color_walk::{Canvas, GridWalker, WalkConfig};
//!
//! let config = WalkConfig::new(8, 8, 4).seed(42);
//! let mut walker = GridWalker::from_config(&config).unwrap();
//!
//! let mut canvas = Canvas::new(8, 8);
//! let outcome = walker.run(|paint| canvas.paint(paint).unwrap()).unwrap();
//!
//! assert!(outcome.is_completed());
//! assert!(canvas.is_complete());
//! ```
//!
//! # Stepping and Cancellation
//!
//! [`GridWalker::step()`] paints one cell at a time, so callers can chunk
//! the walk and yield between chunks. [`GridWalker::run_until()`] polls a
//! [`CancellationChecker`] before each step; [`CancelFlag`] is the shared
//! flag implementation:
//!
//! ```
//! use color_walk::{CancelFlag, GridWalker, Palette, WalkOutcome};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let flag = CancelFlag::new();
//! let mut walker = GridWalker::new(4, 2, Palette::generate(2).unwrap(), StdRng::seed_from_u64(0));
//!
//! let outcome = walker.run_until(&flag, |_| flag.cancel()).unwrap();
//! assert_eq!(outcome, WalkOutcome::Cancelled { painted: 1 });
//! ```
//!
//! # Palette
//!
//! [`Palette::generate()`] samples `levels` values per channel at
//! `step - 1, 2 * step - 1, ..., 255` where `step = 256 / levels`, and
//! enumerates red outermost and blue innermost. A fractional step is
//! rounded per sample, so any `levels` in `1..=256` gives `levels^3`
//! distinct colors; anything outside that range is a [`PaletteError`].
//!
//! # Failure
//!
//! A palette with more colors than the grid has cells runs out of room
//! mid-walk and ends with an [`ExhaustionError`]. [`WalkConfig::validate()`]
//! rejects that configuration up front.

pub mod api;
pub mod color;
pub mod grid;
pub mod output;
pub mod palette;
pub mod walk;


pub use api::{ConfigError, ExhaustionError, WalkConfig, WalkError};
pub use color::Color;
pub use grid::{Position, ScanOrder, UnpaintedSet};
pub use output::{Canvas, CanvasError};
pub use palette::{Palette, PaletteError};
pub use walk::{
    walk, CancelFlag, CancellationChecker, GridWalker, NeighborPolicy, NeverCancel, Paint,
    WalkOptions, WalkOutcome, WalkStats, DEFAULT_SIMILARITY_TOLERANCE,
};
