use crate::mover::RetryPolicy;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_TEST_IMAGE_COUNT: usize = 10;
pub const DEFAULT_TEST_IMAGE_BATCH_SIZE: usize = 2;

/// Tunables for batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrouperConfig {
    /// Emit a progress event every this many processed files.
    pub batch_size: usize,
    pub retry: RetryPolicy,
    pub test_images: TestImageConfig,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
            test_images: TestImageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestImageConfig {
    pub count: usize,
    pub batch_size: usize,
}

impl Default for TestImageConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_TEST_IMAGE_COUNT,
            batch_size: DEFAULT_TEST_IMAGE_BATCH_SIZE,
        }
    }
}

/// True when a progress event is due after `processed` of `total` items.
pub(crate) fn progress_due(processed: usize, total: usize, batch_size: usize) -> bool {
    processed == total || processed % batch_size.max(1) == 0
}
