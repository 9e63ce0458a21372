//! Pool configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::factory::Category;

/// Configuration for a [`PoolManager`](crate::PoolManager).
///
/// The expansion defaults reproduce the classic growth rule
/// `max(5, round(created * 0.5))`: geometric growth bounded below by a
/// fixed minimum, so small pools do not thrash and large ones amortize
/// allocation storms.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfig {
    /// Idle instances pre-created per category at initialization, unless
    /// overridden by the category's template
    pub default_capacity: usize,
    /// Lower bound on the number of instances created per expansion
    pub min_expansion: usize,
    /// Expansion size as a fraction of the category's creation count
    pub expansion_factor: f64,
    /// Cap on instances ever created per category (None for unbounded)
    pub max_per_category: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_capacity: 10,
            min_expansion: 5,
            expansion_factor: 0.5,
            max_per_category: None,
        }
    }
}

impl PoolConfig {
    /// Configuration with a hard per-category creation cap.
    #[must_use]
    pub fn capped(max_per_category: usize) -> Self {
        Self {
            max_per_category: Some(max_per_category),
            ..Default::default()
        }
    }

    /// Set the default prewarm capacity.
    #[must_use]
    pub fn with_default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Validate the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.min_expansion == 0 {
            return Err(Error::configuration("min_expansion must be at least 1"));
        }
        if !self.expansion_factor.is_finite() || self.expansion_factor <= 0.0 {
            return Err(Error::configuration(format!(
                "expansion_factor ({}) must be finite and positive",
                self.expansion_factor
            )));
        }
        if self.max_per_category == Some(0) {
            return Err(Error::configuration(
                "max_per_category must be greater than 0 when set",
            ));
        }
        Ok(())
    }

    /// Number of instances one expansion creates for a category that has
    /// already created `created` instances, before any creation cap.
    pub(crate) fn expansion_size(&self, created: u64) -> usize {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = (created as f64 * self.expansion_factor).round() as usize;
        scaled.max(self.min_expansion)
    }
}

/// Per-category registration: a category plus an optional idle-capacity
/// override used at prewarm time.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryTemplate<C: Category> {
    /// The category this template binds.
    pub category: C,
    /// Prewarm capacity override; falls back to
    /// [`PoolConfig::default_capacity`] when `None`.
    pub idle_capacity: Option<usize>,
}

impl<C: Category> CategoryTemplate<C> {
    /// Template using the pool-wide default capacity.
    #[must_use]
    pub fn new(category: C) -> Self {
        Self {
            category,
            idle_capacity: None,
        }
    }

    /// Template with a per-category capacity override.
    #[must_use]
    pub fn with_capacity(category: C, idle_capacity: usize) -> Self {
        Self {
            category,
            idle_capacity: Some(idle_capacity),
        }
    }
}
