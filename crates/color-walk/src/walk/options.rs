//! Walk tuning options.

use crate::grid::ScanOrder;

/// Default number of palette samples per color search.
pub const DEFAULT_SIMILARITY_TOLERANCE: usize = 500;

/// How the next cell is chosen when several neighbors of the cursor are
/// still unpainted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborPolicy {
    /// Uniformly random among the eligible neighbors.
    #[default]
    Random,
    /// First eligible neighbor, scanning the 3x3 block row by row.
    First,
}

/// Configuration options for a grid walk.
///
/// # Defaults
///
/// - Similarity tolerance: 500 samples per color search
/// - Neighbor policy: [`NeighborPolicy::Random`]
/// - Fallback scan order: [`ScanOrder::ColumnMajor`]
///
/// # Example
///
/// ```
/// use color_walk::{NeighborPolicy, WalkOptions};
///
/// let options = WalkOptions::new()
///     .similarity_tolerance(64)
///     .neighbor_policy(NeighborPolicy::First);
/// assert_eq!(options.similarity_tolerance, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Upper bound on palette samples compared per step.
    ///
    /// Higher values find closer colors at a linear cost per step; the
    /// search is exact only once the tolerance exceeds the palette size by a
    /// wide margin. A value of 0 is treated as 1.
    ///
    /// Default: `500`
    pub similarity_tolerance: usize,

    /// Neighbor tie-break policy.
    ///
    /// Default: [`NeighborPolicy::Random`]
    pub neighbor_policy: NeighborPolicy,

    /// Order of the global scan used when the cursor has no unpainted
    /// neighbor.
    ///
    /// Default: [`ScanOrder::ColumnMajor`]
    pub scan_order: ScanOrder,
}

impl WalkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn similarity_tolerance(mut self, tolerance: usize) -> Self {
        self.similarity_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn neighbor_policy(mut self, policy: NeighborPolicy) -> Self {
        self.neighbor_policy = policy;
        self
    }

    #[inline]
    pub fn scan_order(mut self, order: ScanOrder) -> Self {
        self.scan_order = order;
        self
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            similarity_tolerance: DEFAULT_SIMILARITY_TOLERANCE,
            neighbor_policy: NeighborPolicy::default(),
            scan_order: ScanOrder::default(),
        }
    }
}
