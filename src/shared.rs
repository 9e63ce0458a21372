//! Coarse-lock wrapper for sharing a pool across threads.
//!
//! None of the pool's internal algorithms tolerate interleaved mutation, so
//! the whole manager sits behind a single mutex and every public operation
//! takes the lock for its full duration.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::clock::{Clock, TickClock};
use crate::config::CategoryTemplate;
use crate::error::Result;
use crate::factory::{Factory, Placement};
use crate::handle::Handle;
use crate::manager::PoolManager;
use crate::stats::PoolStats;

/// Cloneable, mutex-guarded handle to a [`PoolManager`].
///
/// # Example
/// ```ignore
/// let shared = SharedPool::new(manager);
/// let worker = shared.clone();
/// std::thread::spawn(move || {
///     let handle = worker.acquire(Fx::Smoke).unwrap();
///     worker.release(handle);
/// });
/// ```
pub struct SharedPool<F, P, K = TickClock>
where
    F: Factory,
    P: Placement<Instance = F::Instance>,
    K: Clock,
{
    inner: Arc<Mutex<PoolManager<F, P, K>>>,
}

impl<F, P, K> Clone for SharedPool<F, P, K>
where
    F: Factory,
    P: Placement<Instance = F::Instance>,
    K: Clock,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F, P, K> SharedPool<F, P, K>
where
    F: Factory,
    P: Placement<Instance = F::Instance>,
    K: Clock,
{
    /// Wrap an owned manager.
    #[must_use]
    pub fn new(manager: PoolManager<F, P, K>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Lock the manager for a sequence of operations.
    ///
    /// Useful when a caller needs several operations to be atomic with
    /// respect to other threads, or needs instance access via
    /// [`PoolManager::instance`].
    pub fn lock(&self) -> MutexGuard<'_, PoolManager<F, P, K>> {
        self.inner.lock()
    }

    /// See [`PoolManager::initialize`].
    pub fn initialize<I>(&self, templates: I) -> Result<()>
    where
        I: IntoIterator<Item = CategoryTemplate<F::Category>>,
    {
        self.inner.lock().initialize(templates)
    }

    /// See [`PoolManager::acquire`].
    pub fn acquire(&self, category: F::Category) -> Result<Handle> {
        self.inner.lock().acquire(category)
    }

    /// See [`PoolManager::acquire_forced`].
    pub fn acquire_forced(&self, category: F::Category) -> Result<Handle> {
        self.inner.lock().acquire_forced(category)
    }

    /// See [`PoolManager::release`].
    pub fn release(&self, handle: Handle) {
        self.inner.lock().release(handle);
    }

    /// See [`PoolManager::spawn`].
    pub fn spawn(&self, category: F::Category, site: &P::Site) -> Result<Handle> {
        self.inner.lock().spawn(category, site)
    }

    /// See [`PoolManager::spawn_forced`].
    pub fn spawn_forced(&self, category: F::Category, site: &P::Site) -> Result<Handle> {
        self.inner.lock().spawn_forced(category, site)
    }

    /// See [`PoolManager::prewarm`].
    pub fn prewarm(&self, category: F::Category, count: usize) -> Result<usize> {
        self.inner.lock().prewarm(category, count)
    }

    /// See [`PoolManager::return_all`].
    pub fn return_all(&self) -> usize {
        self.inner.lock().return_all()
    }

    /// See [`PoolManager::clear_all_pools`].
    pub fn clear_all_pools(&self) {
        self.inner.lock().clear_all_pools();
    }

    /// Run `f` against the instance behind `handle` under the lock.
    pub fn with_instance<R>(&self, handle: Handle, f: impl FnOnce(&mut F::Instance) -> R) -> Option<R> {
        let mut manager = self.inner.lock();
        manager.instance_mut(handle).map(f)
    }

    /// Snapshot of the cumulative statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.lock().stats().clone()
    }

    /// See [`PoolManager::idle_count`].
    #[must_use]
    pub fn idle_count(&self, category: F::Category) -> usize {
        self.inner.lock().idle_count(category)
    }

    /// See [`PoolManager::active_count`].
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }
}
