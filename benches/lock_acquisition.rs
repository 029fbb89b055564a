//! Benchmarks for lock acquisition latency

use criterion::{criterion_group, criterion_main, Criterion};
use quorum_lock::prelude::*;
use std::hint::black_box;
use std::time::Duration;

fn bench_in_memory_lock_acquisition(c: &mut Criterion) {
    let options = LockOptions::new().with_ttl(Duration::from_secs(10));
    let single = SingleStoreLocker::new(InMemoryLockStore::new()).unwrap();
    let multi = MultiStoreLocker::new((0..5).map(|_| InMemoryLockStore::new())).unwrap();

    let mut group = c.benchmark_group("in_memory_lock");
    group.bench_function("single_store_lock_unlock", |b| {
        b.to_async(tokio::runtime::Runtime::new().unwrap())
            .iter(|| async {
                if let Ok(lock) = single.lock(black_box("bench-lock"), options).await {
                    let _ = single.unlock(&lock).await;
                }
            });
    });

    group.bench_function("multi_store_lock_unlock", |b| {
        b.to_async(tokio::runtime::Runtime::new().unwrap())
            .iter(|| async {
                if let Ok(lock) = multi.lock(black_box("bench-lock"), options).await {
                    let _ = multi.unlock(&lock).await;
                }
            });
    });

    group.bench_function("multi_store_is_locked", |b| {
        b.to_async(tokio::runtime::Runtime::new().unwrap())
            .iter(|| async { multi.is_locked(black_box("bench-lock")).await });
    });

    group.finish();
}

criterion_group!(benches, bench_in_memory_lock_acquisition);
criterion_main!(benches);
