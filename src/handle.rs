//! Opaque handles to pooled instances.

use std::fmt;

/// Opaque reference to one pooled resource instance.
///
/// Handles are allocated from a per-manager monotonic counter and are never
/// reused while the instance is alive; the pool keeps the handle→category
/// association itself rather than inferring it from instance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handle(u64);

impl Handle {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id, useful for debug naming of instances.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}
