//! Validated walk parameters.

use super::error::ConfigError;
use crate::palette;
use crate::walk::WalkOptions;

/// Everything needed to set up one walk.
///
/// The grid must have exactly as many cells as the palette has colors:
/// `width * height == levels^3`. [`validate()`](Self::validate) checks this
/// and the other preconditions so that a walk never discovers a sizing
/// mistake halfway through.
///
/// # Example
///
/// ```
/// use color_walk::{ConfigError, WalkConfig};
///
/// assert!(WalkConfig::new(4, 2, 2).validate().is_ok());
/// assert!(matches!(
///     WalkConfig::new(4, 2, 3).validate(),
///     Err(ConfigError::SizeMismatch { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per color channel; the palette has `levels^3` colors.
    pub levels: u32,
    /// Seed for the random source. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub options: WalkOptions,
}

impl WalkConfig {
    pub fn new(width: u32, height: u32, levels: u32) -> Self {
        Self {
            width,
            height,
            levels,
            seed: None,
            options: WalkOptions::default(),
        }
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of grid cells.
    #[inline]
    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Number of palette colors, `levels^3`.
    #[inline]
    pub fn color_count(&self) -> u64 {
        (self.levels as u64).pow(3)
    }

    /// Check every precondition of a walk.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroDimension`] if width or height is 0
    /// - [`ConfigError::ZeroTolerance`] if the similarity tolerance is 0
    /// - [`ConfigError::Palette`] if `levels` cannot be sampled evenly
    /// - [`ConfigError::SizeMismatch`] if `width * height != levels^3`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.options.similarity_tolerance == 0 {
            return Err(ConfigError::ZeroTolerance);
        }
        palette::validate_levels(self.levels)?;
        if self.cell_count() != self.color_count() {
            return Err(ConfigError::SizeMismatch {
                width: self.width,
                height: self.height,
                cells: self.cell_count(),
                levels: self.levels,
                colors: self.color_count(),
            });
        }
        Ok(())
    }
}

impl Default for WalkConfig {
    /// 256x128 canvas with 32 levels per channel (32768 colors).
    fn default() -> Self {
        Self::new(256, 128, 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteError;

    #[test]
    fn test_default_is_valid() {
        let config = WalkConfig::default();
        assert_eq!(config.cell_count(), 32_768);
        assert_eq!(config.color_count(), 32_768);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            WalkConfig::new(0, 8, 2).validate(),
            Err(ConfigError::ZeroDimension {
                width: 0,
                height: 8
            })
        );
    }

    #[test]
    fn test_zero_tolerance_rejected() {
        let config = WalkConfig::new(4, 2, 2)
            .options(WalkOptions::new().similarity_tolerance(0));
        assert_eq!(config.validate(), Err(ConfigError::ZeroTolerance));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert_eq!(
            WalkConfig::new(4, 2, 3).validate(),
            Err(ConfigError::SizeMismatch {
                width: 4,
                height: 2,
                cells: 8,
                levels: 3,
                colors: 27,
            })
        );
    }

    #[test]
    fn test_levels_not_dividing_256_are_valid() {
        assert!(WalkConfig::new(100, 80, 20).validate().is_ok());
        assert!(WalkConfig::new(24 * 24, 24, 24).validate().is_ok());
    }

    #[test]
    fn test_levels_above_256_rejected() {
        assert_eq!(
            WalkConfig::new(1, 1, 257).validate(),
            Err(ConfigError::Palette(PaletteError::InvalidLevels { levels: 257 }))
        );
    }

    #[test]
    fn test_any_shape_with_matching_count_is_valid() {
        assert!(WalkConfig::new(8, 1, 2).validate().is_ok());
        assert!(WalkConfig::new(1, 1, 1).validate().is_ok());
        assert!(WalkConfig::new(9, 3, 3).validate().is_ok());
    }
}
