use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked at migration-round boundaries.
///
/// Clone it, hand one copy to [`crate::run_with_stop`], and call
/// [`StopFlag::cancel`] from any thread; the run returns the best individual
/// found so far once the current round completes.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    cancelled: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
