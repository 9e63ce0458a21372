//! # spawn-pool
//!
//! Capacity-managed resource pool over a closed set of categories.
//!
//! [`PoolManager`] amortizes expensive instance creation by recycling:
//! per category it keeps a FIFO idle queue and a creation counter, and
//! globally it tracks every checked-out handle with its acquisition time.
//! When demand outruns the idle supply it grows the pool geometrically
//! (`max(5, round(created * 0.5))` by default); when growth is impossible
//! and the caller demands a result unconditionally, it evicts the oldest
//! active handle (same category preferred, oldest overall as fallback).
//!
//! Instance fabrication and world placement stay outside the pool, behind
//! the [`Factory`] and [`Placement`] traits; acquisition stamping goes
//! through [`Clock`].
//!
//! The manager is single-threaded by design: every operation runs
//! synchronously to completion, at most one idle-queue pop and one
//! registry scan. [`SharedPool`] wraps it in a coarse mutex for use from
//! multiple threads.

pub mod clock;
pub mod config;
pub mod error;
pub mod factory;
pub mod handle;
pub mod manager;
pub mod registry;
pub mod shared;
pub mod stats;

mod pool;

pub use clock::{Clock, SystemClock, Tick, TickClock};
pub use config::{CategoryTemplate, PoolConfig};
pub use error::{Error, Result};
pub use factory::{Category, Factory, Placement};
pub use handle::Handle;
pub use manager::PoolManager;
pub use registry::ActiveEntry;
pub use shared::SharedPool;
pub use stats::PoolStats;
