//! Pixel grid bookkeeping
//!
//! [`UnpaintedSet`] tracks which cells of the canvas still need a color.
//! Cells only ever go from unpainted to painted, which lets the fallback
//! scan resume where it last stopped instead of restarting at the origin.

mod position;
mod unpainted;

pub use position::Position;
pub use unpainted::{ScanOrder, UnpaintedSet};
