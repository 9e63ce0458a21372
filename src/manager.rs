//! Pool manager: category registration, idle-queue service, dynamic
//! expansion, and oldest-first forced recycling.

use std::collections::HashMap;

use crate::clock::{Clock, TickClock};
use crate::config::{CategoryTemplate, PoolConfig};
use crate::error::{Error, Result};
use crate::factory::{Factory, Placement};
use crate::handle::Handle;
use crate::pool::CategoryPool;
use crate::registry::{ActiveEntry, ActiveRegistry};
use crate::stats::PoolStats;

/// Capacity-managed resource pool over a closed set of categories.
///
/// The manager owns every instance it has ever created (until
/// [`clear_all_pools`](Self::clear_all_pools)) and hands out opaque
/// [`Handle`]s. Per category it keeps a FIFO idle queue and a creation
/// counter; globally it keeps an active registry stamping each checkout
/// with the clock's current tick.
///
/// All operations run synchronously to completion on the calling thread.
/// For concurrent callers, wrap the whole manager in
/// [`SharedPool`](crate::SharedPool).
///
/// # Example
/// ```
/// use spawn_pool::{CategoryTemplate, Factory, Placement, PoolConfig, PoolManager, Result};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Fx { Smoke, Spark }
///
/// struct FxFactory;
///
/// impl Factory for FxFactory {
///     type Category = Fx;
///     type Instance = String;
///
///     fn create(&mut self, category: Fx) -> Result<String> {
///         Ok(format!("{category:?}"))
///     }
/// }
///
/// struct World;
///
/// impl Placement for World {
///     type Instance = String;
///     type Site = (f32, f32);
///
///     fn activate(&mut self, _instance: &mut String, _site: &(f32, f32)) {}
///     fn deactivate(&mut self, _instance: &mut String) {}
/// }
///
/// # fn main() -> Result<()> {
/// let mut pool: PoolManager<FxFactory, World> =
///     PoolManager::new(FxFactory, World, PoolConfig::default())?;
/// pool.initialize([CategoryTemplate::new(Fx::Smoke), CategoryTemplate::new(Fx::Spark)])?;
///
/// let handle = pool.spawn(Fx::Smoke, &(1.0, 2.0))?;
/// pool.release(handle);
/// # Ok(())
/// # }
/// ```
pub struct PoolManager<F, P, K = TickClock>
where
    F: Factory,
    P: Placement<Instance = F::Instance>,
    K: Clock,
{
    factory: F,
    placement: P,
    clock: K,
    config: PoolConfig,
    pools: HashMap<F::Category, CategoryPool>,
    instances: HashMap<Handle, F::Instance>,
    /// Explicit handle→category association, kept for idle and active
    /// handles alike. Never inferred from instance state.
    categories: HashMap<Handle, F::Category>,
    active: ActiveRegistry<F::Category>,
    next_handle: u64,
    initialized: bool,
    stats: PoolStats,
}

impl<F, P, K> PoolManager<F, P, K>
where
    F: Factory,
    P: Placement<Instance = F::Instance>,
    K: Clock,
{
    /// Create a manager with the default clock.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if `config` is invalid.
    pub fn new(factory: F, placement: P, config: PoolConfig) -> Result<Self>
    where
        K: Default,
    {
        Self::with_clock(factory, placement, config, K::default())
    }

    /// Create a manager with an explicit clock.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if `config` is invalid.
    pub fn with_clock(factory: F, placement: P, config: PoolConfig, clock: K) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            factory,
            placement,
            clock,
            config,
            pools: HashMap::new(),
            instances: HashMap::new(),
            categories: HashMap::new(),
            active: ActiveRegistry::new(),
            next_handle: 0,
            initialized: false,
            stats: PoolStats::default(),
        })
    }

    /// Register category templates and prewarm each category's idle queue.
    ///
    /// The prewarm target is the template's `idle_capacity` override, or
    /// [`PoolConfig::default_capacity`]. A duplicate template for the same
    /// category overwrites the prior binding with a warning. Calling
    /// `initialize` on an already-initialized pool warns and returns
    /// `Ok(())` without touching any state.
    pub fn initialize<I>(&mut self, templates: I) -> Result<()>
    where
        I: IntoIterator<Item = CategoryTemplate<F::Category>>,
    {
        if self.initialized {
            tracing::warn!("Pool already initialized; ignoring repeated initialize call");
            return Ok(());
        }

        for template in templates {
            let capacity = template
                .idle_capacity
                .unwrap_or(self.config.default_capacity);
            if let Some(pool) = self.pools.get_mut(&template.category) {
                tracing::warn!(
                    category = ?template.category,
                    capacity,
                    "Duplicate template registration; overwriting prior binding"
                );
                pool.set_prewarm_capacity(capacity);
            } else {
                self.pools
                    .insert(template.category, CategoryPool::new(capacity));
            }
        }

        self.initialized = true;

        let categories: Vec<_> = self.pools.keys().copied().collect();
        for category in categories {
            let capacity = self.pools[&category].prewarm_capacity();
            let warmed = self.prewarm(category, capacity)?;
            tracing::debug!(category = ?category, requested = capacity, warmed, "Prewarmed category");
        }
        Ok(())
    }

    /// Whether [`initialize`](Self::initialize) has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Acquire an idle instance of `category`, expanding the pool if its
    /// idle queue is empty.
    ///
    /// Idle handles are served FIFO, oldest-returned first. The returned
    /// handle is registered active, stamped with the current clock tick.
    ///
    /// # Errors
    /// - [`Error::NotInitialized`] before `initialize`
    /// - [`Error::UnknownCategory`] for an unregistered category
    /// - [`Error::Exhausted`] when the creation cap blocks the fallback
    /// - [`Error::FactoryExhausted`] when the single-instance fallback fails
    pub fn acquire(&mut self, category: F::Category) -> Result<Handle> {
        self.acquire_inner(category, false)
    }

    /// Acquire like [`acquire`](Self::acquire), but evict the oldest active
    /// handle when expansion cannot refill the idle queue.
    ///
    /// Succeeds whenever an active instance of `category` exists anywhere
    /// in the pool, or the factory can still produce one. When the only
    /// active instances belong to other categories, the oldest overall is
    /// released into its own idle queue (freeing one slot) before the
    /// direct-creation fallback runs; a handle created for one category is
    /// never served as another.
    pub fn acquire_forced(&mut self, category: F::Category) -> Result<Handle> {
        self.acquire_inner(category, true)
    }

    fn acquire_inner(&mut self, category: F::Category, forced: bool) -> Result<Handle> {
        self.ensure_initialized()?;
        if !self.pools.contains_key(&category) {
            return Err(Error::unknown_category(category));
        }

        if let Some(handle) = self.pop_idle(category) {
            return Ok(self.mark_active(handle));
        }

        // Soft path: grow the idle supply and retry once.
        self.expand(category);
        if let Some(handle) = self.pop_idle(category) {
            return Ok(self.mark_active(handle));
        }

        if forced {
            if let Some(handle) = self.recycle_oldest(category) {
                return Ok(self.mark_active(handle));
            }
        }

        // Last resort: exactly one direct creation.
        if let Some(max) = self.config.max_per_category {
            let created = self.created_count(category);
            if created >= max as u64 {
                return Err(Error::exhausted(category, created, max));
            }
        }
        match self.create_instance(category) {
            Ok(handle) => Ok(self.mark_active(handle)),
            Err(err) => Err(Error::factory_exhausted(category, Some(err))),
        }
    }

    /// Return `handle` to its category's idle queue.
    ///
    /// The single reclaim path: voluntary release and forced eviction both
    /// route through here. Deactivates the instance via [`Placement`] and
    /// enqueues the handle at the tail. Idempotent no-op for unknown or
    /// already-idle handles.
    pub fn release(&mut self, handle: Handle) {
        let Some(entry) = self.active.remove(handle) else {
            tracing::trace!(%handle, "Release of unknown or idle handle ignored");
            return;
        };

        if let Some(instance) = self.instances.get_mut(&handle) {
            self.placement.deactivate(instance);
        }
        if let Some(pool) = self.pools.get_mut(&entry.category) {
            pool.push_idle(handle);
        }
        self.stats.record_release();
        tracing::trace!(%handle, category = ?entry.category, "Released to idle queue");
    }

    /// Acquire an instance of `category` and activate it at `site`.
    ///
    /// Composition of [`acquire`](Self::acquire) and
    /// [`Placement::activate`]; never partially activates a handle it
    /// failed to obtain.
    pub fn spawn(&mut self, category: F::Category, site: &P::Site) -> Result<Handle> {
        let handle = self.acquire(category)?;
        self.activate(handle, site);
        Ok(handle)
    }

    /// [`spawn`](Self::spawn) on top of [`acquire_forced`](Self::acquire_forced).
    pub fn spawn_forced(&mut self, category: F::Category, site: &P::Site) -> Result<Handle> {
        let handle = self.acquire_forced(category)?;
        self.activate(handle, site);
        Ok(handle)
    }

    fn activate(&mut self, handle: Handle, site: &P::Site) {
        if let Some(instance) = self.instances.get_mut(&handle) {
            self.placement.activate(instance, site);
        }
    }

    /// Create up to `count` idle instances for `category`.
    ///
    /// Appends at the tail of the idle queue. A failed factory attempt is
    /// logged and skipped rather than aborting the batch; the creation cap
    /// truncates the batch. Returns the number actually created.
    ///
    /// # Errors
    /// [`Error::NotInitialized`] / [`Error::UnknownCategory`].
    pub fn prewarm(&mut self, category: F::Category, count: usize) -> Result<usize> {
        self.ensure_initialized()?;
        if !self.pools.contains_key(&category) {
            return Err(Error::unknown_category(category));
        }
        Ok(self.create_idle_batch(category, count))
    }

    /// Forcibly release every active handle.
    ///
    /// Releases against a snapshot of the registry, since release mutates
    /// it. Returns the number released; 0 when nothing was active.
    pub fn return_all(&mut self) -> usize {
        let handles = self.active.snapshot();
        let count = handles.len();
        for handle in handles {
            self.release(handle);
        }
        if count > 0 {
            tracing::debug!(count, "Returned all active handles");
        }
        count
    }

    /// Destroy every instance the pool owns and reset all bookkeeping.
    ///
    /// Idle **and** active instances go through [`Factory::destroy`];
    /// active handles are *not* routed through [`release`](Self::release)
    /// first, so no deactivation callbacks fire; call
    /// [`return_all`](Self::return_all) beforehand if that is wanted.
    /// Registered templates survive and the pool stays initialized.
    pub fn clear_all_pools(&mut self) {
        let count = self.instances.len();
        for (_, instance) in self.instances.drain() {
            self.factory.destroy(instance);
            self.stats.record_destruction();
        }
        self.categories.clear();
        self.active.clear();
        for pool in self.pools.values_mut() {
            pool.drain_idle().for_each(drop);
            pool.reset_created();
        }
        tracing::debug!(destroyed = count, "Cleared all pools");
    }

    // -- Expansion ----------------------------------------------------------

    /// Grow `category`'s idle supply by
    /// `max(min_expansion, round(created * expansion_factor))`, clamped to
    /// the creation cap. Returns the number actually created.
    fn expand(&mut self, category: F::Category) -> usize {
        let Some(pool) = self.pools.get(&category) else {
            return 0;
        };
        let created = pool.created();
        let mut size = self.config.expansion_size(created);
        if let Some(max) = self.config.max_per_category {
            size = size.min((max as u64).saturating_sub(created) as usize);
        }
        if size == 0 {
            return 0;
        }

        tracing::debug!(category = ?category, size, created, "Expanding idle supply");
        let made = self.create_idle_batch(category, size);
        // A batch where every factory attempt failed is not an expansion.
        if made > 0 {
            self.stats.record_expansion();
        }
        made
    }

    fn create_idle_batch(&mut self, category: F::Category, count: usize) -> usize {
        let mut made = 0;
        for _ in 0..count {
            if let Some(max) = self.config.max_per_category {
                if self.created_count(category) >= max as u64 {
                    tracing::warn!(category = ?category, max, "Creation cap reached mid-batch");
                    break;
                }
            }
            match self.create_instance(category) {
                Ok(handle) => {
                    if let Some(pool) = self.pools.get_mut(&category) {
                        pool.push_idle(handle);
                    }
                    made += 1;
                }
                Err(err) => {
                    tracing::warn!(category = ?category, error = %err, "Factory failed; skipping instance");
                }
            }
        }
        made
    }

    // -- Forced recycling ---------------------------------------------------

    /// Evict the oldest active handle to satisfy a forced request.
    ///
    /// One registry scan picks the timestamp-minimal active handle of
    /// `category`, falling back to the oldest overall (ties go to the
    /// lowest handle id; see [`ActiveRegistry`] iteration order). The
    /// victim is released through the normal reclaim path. A same-category
    /// victim is handed straight back to the acquirer, so the round trip
    /// through the idle queue is shortcut. A cross-category victim stays
    /// in its own idle queue and `None` is returned, so the caller falls
    /// through to direct creation without breaking category isolation.
    fn recycle_oldest(&mut self, category: F::Category) -> Option<Handle> {
        let candidate = self.active.oldest_for(category)?;
        tracing::debug!(
            handle = %candidate.handle,
            category = ?candidate.category,
            same_category = candidate.same_category,
            "Forcibly recycling oldest active handle"
        );

        self.release(candidate.handle);
        self.stats.record_recycle();

        if candidate.same_category {
            // The idle queue was empty, so the victim is its only entry.
            self.pools.get_mut(&category)?.pop_idle()
        } else {
            None
        }
    }

    // -- Internals ----------------------------------------------------------

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn pop_idle(&mut self, category: F::Category) -> Option<Handle> {
        self.pools.get_mut(&category)?.pop_idle()
    }

    fn create_instance(&mut self, category: F::Category) -> Result<Handle> {
        let instance = self.factory.create(category)?;
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        self.instances.insert(handle, instance);
        self.categories.insert(handle, category);
        if let Some(pool) = self.pools.get_mut(&category) {
            pool.record_creation();
        }
        self.stats.record_creation();
        tracing::trace!(%handle, category = ?category, "Created instance");
        Ok(handle)
    }

    fn mark_active(&mut self, handle: Handle) -> Handle {
        // Handles only reach here through category-checked paths.
        if let Some(&category) = self.categories.get(&handle) {
            let tick = self.clock.now();
            self.active.insert(handle, category, tick);
            self.stats.record_acquisition();
            tracing::trace!(%handle, category = ?category, tick, "Acquired");
        }
        handle
    }

    // -- Accessors ----------------------------------------------------------

    /// Borrow the instance behind `handle`, if the pool still owns it.
    #[must_use]
    pub fn instance(&self, handle: Handle) -> Option<&F::Instance> {
        self.instances.get(&handle)
    }

    /// Mutably borrow the instance behind `handle`.
    #[must_use]
    pub fn instance_mut(&mut self, handle: Handle) -> Option<&mut F::Instance> {
        self.instances.get_mut(&handle)
    }

    /// Category `handle` was created for, if the pool still owns it.
    #[must_use]
    pub fn category_of(&self, handle: Handle) -> Option<F::Category> {
        self.categories.get(&handle).copied()
    }

    /// Whether `handle` is currently checked out.
    #[must_use]
    pub fn is_active(&self, handle: Handle) -> bool {
        self.active.contains(handle)
    }

    /// Active-registry entry for `handle`.
    #[must_use]
    pub fn active_entry(&self, handle: Handle) -> Option<&ActiveEntry<F::Category>> {
        self.active.get(handle)
    }

    /// Idle handles queued for `category` (0 for unknown categories).
    #[must_use]
    pub fn idle_count(&self, category: F::Category) -> usize {
        self.pools.get(&category).map_or(0, CategoryPool::idle_len)
    }

    /// Active handles across all categories.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active handles of `category`.
    #[must_use]
    pub fn active_count_of(&self, category: F::Category) -> usize {
        self.active.count_of(category)
    }

    /// Instances ever created for `category` (0 for unknown categories).
    #[must_use]
    pub fn created_count(&self, category: F::Category) -> u64 {
        self.pools.get(&category).map_or(0, CategoryPool::created)
    }

    /// Handles the pool currently owns, idle or active.
    #[must_use]
    pub fn known_handles(&self) -> usize {
        self.instances.len()
    }

    /// Cumulative pool statistics.
    #[must_use]
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// The pool's configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Borrow the factory collaborator.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Borrow the placement collaborator.
    #[must_use]
    pub fn placement(&self) -> &P {
        &self.placement
    }
}

impl<F, P, K> std::fmt::Debug for PoolManager<F, P, K>
where
    F: Factory,
    P: Placement<Instance = F::Instance>,
    K: Clock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolManager")
            .field("initialized", &self.initialized)
            .field("categories", &self.pools.len())
            .field("known_handles", &self.instances.len())
            .field("active", &self.active.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
