//! Active registry: which handles are checked out, and since when.

use std::collections::BTreeMap;

use crate::clock::Tick;
use crate::factory::Category;
use crate::handle::Handle;

/// Bookkeeping entry for one active handle.
#[derive(Debug, Clone, Copy)]
pub struct ActiveEntry<C: Category> {
    /// Category the handle was created for.
    pub category: C,
    /// Timestamp of the acquisition that made it active.
    pub acquired_at: Tick,
}

/// The handle the forced-recycle scan settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecycleCandidate<C: Category> {
    pub(crate) handle: Handle,
    pub(crate) category: C,
    /// Whether the candidate matches the requested category.
    pub(crate) same_category: bool,
}

/// Mapping from active handle to its category and acquisition time.
///
/// Backed by a `BTreeMap` so iteration is ascending by handle id, the
/// documented, deterministic tie-break order for forced recycling.
#[derive(Debug)]
pub(crate) struct ActiveRegistry<C: Category> {
    entries: BTreeMap<Handle, ActiveEntry<C>>,
}

impl<C: Category> ActiveRegistry<C> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, handle: Handle, category: C, acquired_at: Tick) {
        self.entries.insert(
            handle,
            ActiveEntry {
                category,
                acquired_at,
            },
        );
    }

    pub(crate) fn remove(&mut self, handle: Handle) -> Option<ActiveEntry<C>> {
        self.entries.remove(&handle)
    }

    pub(crate) fn get(&self, handle: Handle) -> Option<&ActiveEntry<C>> {
        self.entries.get(&handle)
    }

    pub(crate) fn contains(&self, handle: Handle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all active handles, ascending by id.
    ///
    /// `return_all` releases against the snapshot since release mutates
    /// the registry.
    pub(crate) fn snapshot(&self) -> Vec<Handle> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn count_of(&self, category: C) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.category == category)
            .count()
    }

    /// Single scan for the forced-recycle victim.
    ///
    /// Tracks two running minima by acquisition timestamp: the oldest
    /// entry of the requested category and the oldest overall. Strict-less
    /// comparison means the first entry encountered (lowest handle id)
    /// wins timestamp ties. Same-category wins over overall-oldest.
    pub(crate) fn oldest_for(&self, category: C) -> Option<RecycleCandidate<C>> {
        let mut oldest_same: Option<(Handle, Tick)> = None;
        let mut oldest_any: Option<(Handle, C, Tick)> = None;

        for (&handle, entry) in &self.entries {
            if oldest_any.is_none_or(|(_, _, tick)| entry.acquired_at < tick) {
                oldest_any = Some((handle, entry.category, entry.acquired_at));
            }
            if entry.category == category
                && oldest_same.is_none_or(|(_, tick)| entry.acquired_at < tick)
            {
                oldest_same = Some((handle, entry.acquired_at));
            }
        }

        if let Some((handle, _)) = oldest_same {
            return Some(RecycleCandidate {
                handle,
                category,
                same_category: true,
            });
        }
        oldest_any.map(|(handle, category, _)| RecycleCandidate {
            handle,
            category,
            same_category: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        A,
        B,
    }

    fn registry() -> ActiveRegistry<Kind> {
        ActiveRegistry::new()
    }

    #[test]
    fn oldest_prefers_same_category() {
        let mut reg = registry();
        reg.insert(Handle::new(1), Kind::A, 10);
        reg.insert(Handle::new(2), Kind::B, 0); // older overall, wrong category

        let candidate = reg.oldest_for(Kind::A).unwrap();
        assert_eq!(candidate.handle, Handle::new(1));
        assert!(candidate.same_category);
    }

    #[test]
    fn oldest_falls_back_to_any_category() {
        let mut reg = registry();
        reg.insert(Handle::new(1), Kind::B, 5);
        reg.insert(Handle::new(2), Kind::B, 3);

        let candidate = reg.oldest_for(Kind::A).unwrap();
        assert_eq!(candidate.handle, Handle::new(2));
        assert_eq!(candidate.category, Kind::B);
        assert!(!candidate.same_category);
    }

    #[test]
    fn tie_break_is_lowest_handle_id() {
        let mut reg = registry();
        reg.insert(Handle::new(9), Kind::A, 7);
        reg.insert(Handle::new(3), Kind::A, 7);
        reg.insert(Handle::new(5), Kind::A, 7);

        let candidate = reg.oldest_for(Kind::A).unwrap();
        assert_eq!(candidate.handle, Handle::new(3));
    }

    #[test]
    fn empty_registry_has_no_candidate() {
        assert!(registry().oldest_for(Kind::A).is_none());
    }

    #[test]
    fn snapshot_is_ascending() {
        let mut reg = registry();
        reg.insert(Handle::new(4), Kind::A, 1);
        reg.insert(Handle::new(1), Kind::B, 2);
        assert_eq!(reg.snapshot(), vec![Handle::new(1), Handle::new(4)]);
    }
}
