//! In-memory RGB canvas that records walk paints.

use thiserror::Error;

use crate::color::Color;
use crate::grid::Position;
use crate::walk::Paint;

/// Rejected paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// Position lies outside the canvas
    #[error("position {0} is outside the canvas")]
    OutOfBounds(Position),
    /// Position was painted before
    #[error("position {0} was already painted")]
    AlreadyPainted(Position),
}

/// A drawing surface for walk output.
///
/// Stores one color per cell in row-major order and refuses to paint a
/// cell twice, so a completed canvas proves the walk covered the grid
/// exactly once. Unpainted cells read as black in [`to_rgb()`](Self::to_rgb).
///
/// # Example
///
/// ```
/// use color_walk::{Canvas, GridWalker, Palette};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut canvas = Canvas::new(4, 2);
/// let mut walker = GridWalker::new(4, 2, Palette::generate(2).unwrap(), StdRng::seed_from_u64(1));
/// walker.run(|paint| canvas.paint(paint).unwrap()).unwrap();
///
/// assert!(canvas.is_complete());
/// assert_eq!(canvas.to_rgb().len(), 4 * 2 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Option<Color>>,
    painted: usize,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
            painted: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells painted so far.
    #[inline]
    pub fn painted_count(&self) -> usize {
        self.painted
    }

    /// Whether every cell has been painted.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.painted == self.pixels.len()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Color at `pos`, if painted.
    pub fn get(&self, pos: Position) -> Option<Color> {
        self.index(pos).and_then(|i| self.pixels[i])
    }

    /// Record one paint.
    ///
    /// # Errors
    ///
    /// [`CanvasError`] if the position is off the canvas or already painted;
    /// the canvas is left unchanged.
    pub fn paint(&mut self, paint: Paint) -> Result<(), CanvasError> {
        let index = self
            .index(paint.position)
            .ok_or(CanvasError::OutOfBounds(paint.position))?;
        let slot = &mut self.pixels[index];
        if slot.is_some() {
            return Err(CanvasError::AlreadyPainted(paint.position));
        }
        *slot = Some(paint.color);
        self.painted += 1;
        Ok(())
    }

    /// Painted colors in row-major order, skipping unpainted cells.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixels.iter().flatten().copied()
    }

    /// Flat `[r, g, b, r, g, b, ...]` buffer in row-major order.
    ///
    /// The returned buffer has length `width * height * 3`.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            rgb.extend_from_slice(&pixel.unwrap_or(Color::new(0, 0, 0)).to_bytes());
        }
        rgb
    }
}
