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
//! Benchmarks for the gameplay systems
//!
//! Measures the quadratic combat pass and a full scheduled frame over
//! growing monster and bullet counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use platformer_engine::config::EngineConfig;
use platformer_engine::ecs::{EntityPool, Scheduler};
use platformer_engine::game::components::Direction;
use platformer_engine::game::spawn::{spawn_bullet, spawn_monster, spawn_player};
use platformer_engine::game::{add_gameplay_systems, resolve_damage};
use platformer_engine::physics::TileMap;
use platformer_engine::world::World;

fn arena(pool: &mut EntityPool, monsters: usize, bullets: usize, config: &EngineConfig) {
    spawn_player(pool, Vec2::new(0.0, 0.0), Vec2::new(24.0, 32.0), 100).unwrap();
    for i in 0..monsters {
        let x = 64.0 + (i % 100) as f32 * 40.0;
        let y = (i / 100) as f32 * 40.0;
        spawn_monster(pool, Vec2::new(x, y), Vec2::splat(32.0), 1_000_000, Vec2::new(-60.0, 0.0)).unwrap();
    }
    for i in 0..bullets {
        let x = 64.0 + (i % 100) as f32 * 40.0;
        let y = 200.0 + (i / 100) as f32 * 40.0;
        spawn_bullet(pool, Vec2::new(x, y), Direction::Right, config).unwrap();
    }
}

fn bench_resolve_damage(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_damage");
    let config = EngineConfig::default();

    for n in [10, 100, 500].iter() {
        let mut pool = EntityPool::new();
        arena(&mut pool, *n, *n, &config);

        group.bench_with_input(BenchmarkId::new("no_contact", n), n, |b, _| {
            b.iter(|| black_box(resolve_damage(&mut pool, &config).unwrap()));
        });
    }

    group.finish();
}

fn bench_scheduled_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduled_frame");

    for n in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("movement_and_combat", n), n, |b, &n| {
            let config = EngineConfig::default();
            let tiles = TileMap::new(128, 64, config.tile_size);
            let mut world = World::new(config.clone(), tiles);
            arena(&mut world.entities, n, 0, &config);
            let mut scheduler = Scheduler::new();
            add_gameplay_systems(&mut scheduler);

            b.iter(|| {
                scheduler.run(&mut world, 1.0 / 60.0).unwrap();
                black_box(world.end_frame())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_damage, bench_scheduled_frame);
criterion_main!(benches);
