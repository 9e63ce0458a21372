//! Collaborator traits at the pool boundary.
//!
//! The pool fabricates instances through [`Factory`] and makes them
//! visible/usable through [`Placement`]; it defines neither's semantics.
//! Both are called synchronously from within pool operations.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// Marker for pool partition keys.
///
/// Categories form a finite, statically known set, typically a fieldless
/// enum. Blanket-implemented for any type with the right bounds.
pub trait Category: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> Category for T {}

/// Fabricates brand-new, deactivated resource instances.
///
/// One factory serves every category of its pool, dispatching on the
/// category argument. Pure creation: a factory has no pooling knowledge and
/// must never hand out an instance already bound elsewhere.
pub trait Factory {
    /// The partition key type for this factory's pool.
    type Category: Category;

    /// The instance type produced by this factory.
    type Instance;

    /// Create one new, deactivated instance for `category`.
    ///
    /// # Errors
    /// Signal failure rather than panicking; the pool logs and skips failed
    /// attempts during prewarm/expansion and only propagates a failure from
    /// the final single-instance fallback.
    fn create(&mut self, category: Self::Category) -> Result<Self::Instance>;

    /// Release an instance for good.
    ///
    /// Called only from [`PoolManager::clear_all_pools`](crate::PoolManager::clear_all_pools).
    fn destroy(&mut self, instance: Self::Instance) {
        drop(instance);
    }
}

/// Applies and reverts world placement of an instance.
///
/// `activate` positions an instance and makes it visible; `deactivate`
/// hides it again. The pool guarantees `deactivate` runs on every voluntary
/// or forced release, and that instances sit deactivated while idle.
pub trait Placement {
    /// The instance type this placement operates on.
    type Instance;

    /// Position/orientation data applied on activation.
    type Site;

    /// Make `instance` visible/usable at `site`.
    fn activate(&mut self, instance: &mut Self::Instance, site: &Self::Site);

    /// Make `instance` invisible/unusable.
    fn deactivate(&mut self, instance: &mut Self::Instance);
}
