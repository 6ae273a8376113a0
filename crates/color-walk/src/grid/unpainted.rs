//! Unpainted-cell bitmap with neighborhood and fallback queries.

use super::position::Position;

/// Order in which the fallback scan visits the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Column by column, top to bottom within a column.
    #[default]
    ColumnMajor,
    /// Row by row, left to right within a row.
    RowMajor,
}

impl ScanOrder {
    /// Position of the `k`-th cell visited in this order.
    #[inline]
    fn position_at(self, k: usize, width: u32, height: u32) -> Position {
        match self {
            ScanOrder::ColumnMajor => {
                Position::new((k / height as usize) as u32, (k % height as usize) as u32)
            }
            ScanOrder::RowMajor => {
                Position::new((k % width as usize) as u32, (k / width as usize) as u32)
            }
        }
    }

    #[inline]
    fn hint_slot(self) -> usize {
        match self {
            ScanOrder::ColumnMajor => 0,
            ScanOrder::RowMajor => 1,
        }
    }
}

/// Per-cell fill status for a `width` x `height` canvas.
///
/// Every cell starts unpainted and flips to painted exactly once via
/// [`mark_painted()`](Self::mark_painted). The set keeps a running count of
/// unpainted cells so exhaustion checks are O(1).
///
/// # Example
///
/// ```
/// use color_walk::{Position, ScanOrder, UnpaintedSet};
///
/// let mut cells = UnpaintedSet::new(3, 2);
/// assert_eq!(cells.remaining(), 6);
///
/// assert!(cells.mark_painted(Position::new(0, 0)));
/// assert!(!cells.mark_painted(Position::new(0, 0)));
/// assert_eq!(cells.first_unpainted(ScanOrder::ColumnMajor), Some(Position::new(0, 1)));
/// assert_eq!(cells.first_unpainted(ScanOrder::RowMajor), Some(Position::new(1, 0)));
/// ```
#[derive(Debug, Clone)]
pub struct UnpaintedSet {
    width: u32,
    height: u32,
    /// Row-major, `true` = unpainted.
    cells: Vec<bool>,
    remaining: usize,
    /// Per scan order: every cell visited before this index is painted.
    scan_hints: [usize; 2],
}

impl UnpaintedSet {
    /// Create a set with every cell unpainted.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![true; len],
            remaining: len,
            scan_hints: [0; 2],
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

    /// Total number of cells, painted or not.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells still unpainted.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Whether every cell has been painted.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Whether `pos` lies on the grid.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Whether `pos` is on the grid and not yet painted.
    #[inline]
    pub fn is_unpainted(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[self.index(pos)]
    }

    /// Mark `pos` as painted.
    ///
    /// Returns `true` if the cell was unpainted before the call, `false` if
    /// it was already painted or lies off the grid.
    pub fn mark_painted(&mut self, pos: Position) -> bool {
        if !self.is_unpainted(pos) {
            return false;
        }
        let index = self.index(pos);
        self.cells[index] = false;
        self.remaining -= 1;
        true
    }

    /// Append the unpainted cells of the 8-neighborhood of `center` to `out`.
    ///
    /// The 3x3 block is clipped to the grid and visited row by row, left to
    /// right; `center` itself is never included.
    pub fn unpainted_neighbors(&self, center: Position, out: &mut Vec<Position>) {
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let x = center.x as i64 + dx;
                let y = center.y as i64 + dy;
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let pos = Position::new(x as u32, y as u32);
                if self.cells[self.index(pos)] {
                    out.push(pos);
                }
            }
        }
    }

    /// First unpainted cell in `order`, or `None` if the grid is full.
    ///
    /// Cells never become unpainted again, so the scan resumes from where
    /// the previous scan in the same order stopped. Amortized over a walk
    /// this visits each cell once per order.
    pub fn first_unpainted(&mut self, order: ScanOrder) -> Option<Position> {
        let slot = order.hint_slot();
        let total = self.cells.len();
        let mut k = self.scan_hints[slot];
        while k < total {
            let pos = order.position_at(k, self.width, self.height);
            if self.cells[self.index(pos)] {
                self.scan_hints[slot] = k;
                return Some(pos);
            }
            k += 1;
        }
        self.scan_hints[slot] = total;
        None
    }
}
