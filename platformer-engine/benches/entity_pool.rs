// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for the entity pool
//!
//! Measures entity churn (create, destroy, sweep) and signature query cost,
//! and the effect of the snapshot buffer pool on repeated queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use platformer_engine::ecs::EntityPool;
use platformer_engine::game::components::{Gravity, Health, Monster, Position, Velocity};
use platformer_engine::pool::PoolConfig;

fn populated(n: usize, config: PoolConfig) -> EntityPool {
    let mut pool = EntityPool::with_config(config);
    for i in 0..n {
        let e = pool.create();
        pool.set(e, Position::new(i as f32, 0.0)).unwrap();
        pool.set(e, Velocity::new(1.0, 0.0)).unwrap();
        pool.set(e, Health::new(10, 32.0, 32.0)).unwrap();
        if i % 2 == 0 {
            pool.set(e, Monster).unwrap();
            pool.set(e, Gravity).unwrap();
        }
    }
    pool
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_churn");

    for n in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("create_destroy_sweep", n), n, |b, &n| {
            let mut pool = EntityPool::new();
            b.iter(|| {
                for _ in 0..n {
                    let e = pool.create();
                    pool.set(e, Position::new(0.0, 0.0)).unwrap();
                    pool.destroy(e);
                }
                black_box(pool.sweep());
                pool.drain_events();
            });
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature_query");

    for n in [100, 1000, 10000].iter() {
        let mut pool = populated(*n, PoolConfig::default());
        group.throughput(Throughput::Elements(*n as u64));

        group.bench_with_input(BenchmarkId::new("each_two_kinds", n), n, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                pool.each::<(Position, Velocity)>(|pool, e| {
                    if let Ok(p) = pool.get::<Position>(e) {
                        sum += p.x;
                    }
                });
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("each_four_kinds", n), n, |b, _| {
            b.iter(|| {
                let mut count = 0usize;
                pool.each::<(Position, Velocity, Health, Monster)>(|_, _| count += 1);
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_snapshot_pooling(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_pooling");

    for (label, config) in [
        ("default", PoolConfig::default()),
        ("large_capacity", PoolConfig::new(4096, 16)),
    ] {
        let pool = populated(1000, config);
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut cursor = pool.query::<(Position, Health)>();
                let mut count = 0usize;
                while cursor.next(&pool).is_some() {
                    count += 1;
                }
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_churn, bench_query, bench_snapshot_pooling);
criterion_main!(benches);
