//! Per-category pool state: idle FIFO queue and creation counter.

use std::collections::VecDeque;

use crate::handle::Handle;

/// State the manager keeps for one registered category.
///
/// Invariant: every handle in `idle` is deactivated and absent from the
/// active registry.
#[derive(Debug)]
pub(crate) struct CategoryPool {
    /// Idle handles, oldest-returned at the front.
    idle: VecDeque<Handle>,
    /// Instances ever created for this category; sizes expansion.
    created: u64,
    /// Prewarm capacity resolved at registration time.
    prewarm_capacity: usize,
}

impl CategoryPool {
    pub(crate) fn new(prewarm_capacity: usize) -> Self {
        Self {
            idle: VecDeque::with_capacity(prewarm_capacity),
            created: 0,
            prewarm_capacity,
        }
    }

    /// Pop the oldest idle handle (FIFO).
    pub(crate) fn pop_idle(&mut self) -> Option<Handle> {
        self.idle.pop_front()
    }

    /// Enqueue a handle at the tail of the idle queue.
    pub(crate) fn push_idle(&mut self, handle: Handle) {
        self.idle.push_back(handle);
    }

    /// Drain every idle handle, front first.
    pub(crate) fn drain_idle(&mut self) -> impl Iterator<Item = Handle> + '_ {
        self.idle.drain(..)
    }

    pub(crate) fn record_creation(&mut self) {
        self.created += 1;
    }

    pub(crate) fn reset_created(&mut self) {
        self.created = 0;
    }

    pub(crate) fn idle_len(&self) -> usize {
        self.idle.len()
    }

    pub(crate) fn created(&self) -> u64 {
        self.created
    }

    pub(crate) fn prewarm_capacity(&self) -> usize {
        self.prewarm_capacity
    }

    pub(crate) fn set_prewarm_capacity(&mut self, capacity: usize) {
        self.prewarm_capacity = capacity;
    }
}
