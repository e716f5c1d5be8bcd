use crate::batch::DEFAULT_BATCH_CAPACITY;

/// Parameters fixed for the lifetime of a [`Draw`](super::Draw) session.
#[derive(Debug, Clone)]
pub struct DrawConfig {
    /// Size in bytes of the immediate batch and of its dynamic vertex buffer.
    ///
    /// A single fan-expanded polygon larger than this can never be drawn.
    pub immediate_batch_capacity: usize,

    /// Enables the contract checks that are fatal in debug builds.
    ///
    /// When off, an oversized immediate polygon is dropped instead of
    /// panicking, and the post-commit state consistency check is skipped.
    pub debug_checks: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            immediate_batch_capacity: DEFAULT_BATCH_CAPACITY,
            debug_checks: cfg!(debug_assertions),
        }
    }
}

impl DrawConfig {
    #[inline]
    pub fn with_batch_capacity(mut self, bytes: usize) -> Self {
        self.immediate_batch_capacity = bytes;
        self
    }

    #[inline]
    pub fn with_debug_checks(mut self, enabled: bool) -> Self {
        self.debug_checks = enabled;
        self
    }
}
