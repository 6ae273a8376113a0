/// Counters collected while walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Cells painted so far, including the start cell.
    pub steps: usize,
    /// Steps whose cell came from the cursor's neighborhood.
    pub neighbor_steps: usize,
    /// Steps that had to fall back to the global scan.
    pub fallback_steps: usize,
    /// Sum of squared color distances between consecutive paints.
    pub total_distance_sq: u64,
}

impl WalkStats {
    /// Mean squared color distance per step after the start cell.
    pub fn mean_distance_sq(&self) -> f64 {
        let transitions = self.neighbor_steps + self.fallback_steps;
        if transitions == 0 {
            0.0
        } else {
            self.total_distance_sq as f64 / transitions as f64
        }
    }

    /// Share of steps that needed the global scan, in `0.0..=1.0`.
    pub fn fallback_ratio(&self) -> f64 {
        let transitions = self.neighbor_steps + self.fallback_steps;
        if transitions == 0 {
            0.0
        } else {
            self.fallback_steps as f64 / transitions as f64
        }
    }
}
