//! Pool statistics.

/// Cumulative pool counters.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Total successful acquisitions (soft and forced).
    pub total_acquisitions: u64,
    /// Total releases back to idle queues (voluntary and forced).
    pub total_releases: u64,
    /// Total forced recycles (an active handle evicted under pressure).
    pub total_recycled: u64,
    /// Total expansion runs triggered by an empty idle queue.
    pub total_expansions: u64,
    /// Total instances ever created across all categories.
    pub created: u64,
    /// Total instances ever destroyed (clear_all_pools).
    pub destroyed: u64,
}

impl PoolStats {
    pub(crate) fn record_acquisition(&mut self) {
        self.total_acquisitions += 1;
    }

    pub(crate) fn record_release(&mut self) {
        self.total_releases += 1;
    }

    pub(crate) fn record_recycle(&mut self) {
        self.total_recycled += 1;
    }

    pub(crate) fn record_expansion(&mut self) {
        self.total_expansions += 1;
    }

    pub(crate) fn record_creation(&mut self) {
        self.created += 1;
    }

    pub(crate) fn record_destruction(&mut self) {
        self.destroyed += 1;
    }
}
