//! Palette types and generation
//!
//! This module provides the evenly sampled palette generator and the
//! shrinking [`Palette`] the walker draws from.

mod error;
mod palette;

pub use error::PaletteError;
pub use palette::{channel_samples, generate, validate_levels, Palette, CHANNEL_VALUES};
