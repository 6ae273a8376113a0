use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Polled once per walk step; returning `true` stops the walk.
pub trait CancellationChecker {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels, for walks that always run to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so one half can be handed to the thread
/// running the walk while the other stays with whoever may cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl CancellationChecker for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
