// Pool throughput benchmarks.
//
// Measures raw acquire/release overhead and the forced-recycle path with a
// zero-cost instance (no asset work in the factory or placement).

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use spawn_pool::{
    CategoryTemplate, Factory, Placement, PoolConfig, PoolManager, Result,
};

// -- Minimal no-op collaborators for measuring pool overhead only --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Unit,
}

struct NoOpFactory;

impl Factory for NoOpFactory {
    type Category = Kind;
    type Instance = u64;

    fn create(&mut self, _category: Kind) -> Result<u64> {
        Ok(0)
    }
}

struct NoOpPlacement;

impl Placement for NoOpPlacement {
    type Instance = u64;
    type Site = ();

    fn activate(&mut self, _instance: &mut u64, (): &()) {}
    fn deactivate(&mut self, _instance: &mut u64) {}
}

fn prewarmed_pool(capacity: usize, capped: bool) -> PoolManager<NoOpFactory, NoOpPlacement> {
    let config = if capped {
        PoolConfig::capped(capacity).with_default_capacity(capacity)
    } else {
        PoolConfig::default().with_default_capacity(capacity)
    };
    let mut pool: PoolManager<NoOpFactory, NoOpPlacement> =
        PoolManager::new(NoOpFactory, NoOpPlacement, config).unwrap();
    pool.initialize([CategoryTemplate::new(Kind::Unit)]).unwrap();
    pool
}

fn bench_acquire_release(c: &mut Criterion) {
    let mut pool = prewarmed_pool(64, false);
    c.bench_function("acquire_release_cycle", |b| {
        b.iter(|| {
            let handle = pool.acquire(black_box(Kind::Unit)).unwrap();
            pool.release(black_box(handle));
        });
    });
}

fn bench_spawn_release(c: &mut Criterion) {
    let mut pool = prewarmed_pool(64, false);
    c.bench_function("spawn_release_cycle", |b| {
        b.iter(|| {
            let handle = pool.spawn(black_box(Kind::Unit), &()).unwrap();
            pool.release(black_box(handle));
        });
    });
}

fn bench_forced_recycle(c: &mut Criterion) {
    // Saturate a capped pool so every forced acquire takes the eviction
    // path: one registry scan plus a release/re-pop.
    let mut pool = prewarmed_pool(64, true);
    for _ in 0..64 {
        pool.acquire(Kind::Unit).unwrap();
    }
    c.bench_function("forced_recycle_under_pressure", |b| {
        b.iter(|| {
            let handle = pool.acquire_forced(black_box(Kind::Unit)).unwrap();
            black_box(handle);
        });
    });
}

criterion_group!(
    benches,
    bench_acquire_release,
    bench_spawn_release,
    bench_forced_recycle
);
criterion_main!(benches);
