use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::GrouperError;

/// Process-wide `Idle | Running` flag; at most one batch runs at a time.
#[derive(Debug, Default)]
pub struct OperationState {
    running: AtomicBool,
}

impl OperationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move from Idle to Running, or report Busy.
    pub fn try_begin(&self) -> Result<(), GrouperError> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| GrouperError::Busy)
    }

    /// Back to Idle.
    pub fn end(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
