//! Error types for walk configuration and execution.
//!
//! [`WalkError`] wraps both failure kinds for convenient `?` propagation in
//! application code that validates and runs in one go.

use thiserror::Error;

use crate::palette::PaletteError;

/// No unpainted cell is left although the palette still has colors.
///
/// This only happens when the grid has fewer cells than the palette has
/// colors, which [`WalkConfig::validate()`](crate::WalkConfig::validate)
/// rules out up front. It is not recoverable within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no unpainted cell left but {remaining_colors} palette colors remain")]
pub struct ExhaustionError {
    /// Palette colors still unused when the grid ran out
    pub remaining_colors: usize,
}

/// Invalid walk parameters, detected before any walking starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("canvas dimensions must be positive (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("similarity tolerance must be at least 1")]
    ZeroTolerance,

    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error(
        "canvas {width}x{height} has {cells} cells but {levels} levels give {colors} colors"
    )]
    SizeMismatch {
        width: u32,
        height: u32,
        cells: u64,
        levels: u32,
        colors: u64,
    },
}

/// Unified error type for validating and running a walk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    #[error("invalid walk configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("walk exhausted: {0}")]
    Exhausted(#[from] ExhaustionError),
}
