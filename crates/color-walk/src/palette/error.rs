//! Error types for palette operations

use thiserror::Error;

/// Error type for palette generation and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Channel level count outside `1..=256`
    #[error("invalid channel levels {levels} (expected 1..=256)")]
    InvalidLevels {
        /// Requested level count
        levels: u32,
    },

    /// Duplicate color found at the specified index
    #[error("duplicate color found at index {index}")]
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
}
