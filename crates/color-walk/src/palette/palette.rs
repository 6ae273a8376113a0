//! Evenly sampled palette generation and the shrinking walk palette.

use std::collections::HashSet;

use super::error::PaletteError;
use crate::color::Color;

/// Number of distinct values an 8-bit channel can take.
pub const CHANNEL_VALUES: u32 = 256;

/// Check that `levels` is a usable sample count per channel.
pub fn validate_levels(levels: u32) -> Result<(), PaletteError> {
    if levels == 0 || levels > CHANNEL_VALUES {
        return Err(PaletteError::InvalidLevels { levels });
    }
    Ok(())
}

/// The `levels` values sampled from one channel.
///
/// Sample `k` is `round((k + 1) * 256 / levels) - 1`. When `levels` divides
/// 256 this is the integer step sequence `step - 1, 2 * step - 1, ...`;
/// otherwise the fractional step is rounded per sample. The last sample is
/// always 255 and samples are strictly increasing. Callers must pass
/// `1..=256`.
///
/// ```
/// use color_walk::palette::channel_samples;
///
/// assert_eq!(channel_samples(4), vec![63, 127, 191, 255]);
/// assert_eq!(channel_samples(3), vec![84, 170, 255]);
/// ```
pub fn channel_samples(levels: u32) -> Vec<u8> {
    (1..=levels)
        .map(|k| {
            // Half-up rounding of k * 256 / levels in integers
            let rounded = (2 * k * CHANNEL_VALUES + levels) / (2 * levels);
            (rounded - 1) as u8
        })
        .collect()
}

/// Enumerate `levels^3` colors by sampling every channel evenly.
///
/// Each channel takes the values of [`channel_samples`], so the brightest
/// sample of every channel is always 255. Colors are emitted with `r`
/// outermost and `b` innermost. The result is deterministic and free of
/// duplicates for every `levels` in `1..=256`.
///
/// # Errors
///
/// [`PaletteError::InvalidLevels`] if `levels` is 0 or above 256.
///
/// # Example
///
/// ```
/// use color_walk::{palette, Color};
///
/// let colors = palette::generate(2).unwrap();
/// assert_eq!(colors.len(), 8);
/// assert_eq!(colors[0], Color::new(127, 127, 127));
/// assert_eq!(colors[7], Color::new(255, 255, 255));
/// ```
pub fn generate(levels: u32) -> Result<Vec<Color>, PaletteError> {
    validate_levels(levels)?;

    let samples = channel_samples(levels);
    let mut colors = Vec::with_capacity(samples.len().pow(3));
    for &r in &samples {
        for &g in &samples {
            for &b in &samples {
                colors.push(Color::new(r, g, b));
            }
        }
    }
    Ok(colors)
}

/// The set of colors not yet used by a walk.
///
/// A `Palette` only ever shrinks: [`take()`](Self::take) removes a color by
/// index and nothing adds colors back. Removal swaps the last color into the
/// freed slot, so indices are only stable until the next removal. Order
/// carries no meaning beyond supporting indexed access.
///
/// # Example
///
/// ```
/// use color_walk::Palette;
///
/// let mut palette = Palette::generate(2).unwrap();
/// assert_eq!(palette.len(), 8);
///
/// let first = palette.take(0);
/// assert_eq!(palette.len(), 7);
/// assert!(!palette.colors().contains(&first));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Generate the full evenly sampled palette for `levels` per channel.
    ///
    /// See [`generate`] for the enumeration and its errors.
    pub fn generate(levels: u32) -> Result<Self, PaletteError> {
        Ok(Self {
            colors: generate(levels)?,
        })
    }

    /// Build a palette from arbitrary colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::DuplicateColor`] if a color appears twice.
    pub fn from_colors(colors: Vec<Color>) -> Result<Self, PaletteError> {
        let mut seen = HashSet::with_capacity(colors.len());
        for (index, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index });
            }
        }
        Ok(Self { colors })
    }

    /// Number of colors still available.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether every color has been used.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, if present.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Remaining colors in their current storage order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Remove and return the color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn take(&mut self, index: usize) -> Color {
        self.colors.swap_remove(index)
    }
}
