//! Paint sinks
//!
//! Anything that accepts a stream of [`Paint`](crate::Paint)s can draw a
//! walk. [`Canvas`] is the in-memory buffer used for image encoding and
//! for checking coverage.

mod canvas;

pub use canvas::{Canvas, CanvasError};
