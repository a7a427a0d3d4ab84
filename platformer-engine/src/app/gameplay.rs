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
//! The playable scene
//!
//! [`GamePlayState`] owns the world, the hero and the system schedule and
//! runs one frame in a fixed order:
//!
//! 1. hero key events
//! 2. hero tile collision
//! 3. hero hit box published to the pool
//! 4. ECS systems (control, movement, combat, cleanup)
//! 5. knockback handed back to the hero, hero state update
//! 6. sweep of destroyed entities

use crate::app::state::{GameState, Transition};
use crate::config::EngineConfig;
use crate::ecs::Scheduler;
use crate::error::{EcsResult, RenderResult};
use crate::game::add_gameplay_systems;
use crate::game::components::{Bullet, Health, Monster, Position};
use crate::hero::Hero;
use crate::input::InputState;
use crate::physics::{TileMap, TileType};
use crate::render::{Color, RenderContext};
use crate::world::World;
use glam::Vec2;

/// Hero hit box in pixels
pub const HERO_SIZE: Vec2 = Vec2::new(24.0, 32.0);

/// Scene running the platformer simulation
#[derive(Debug)]
pub struct GamePlayState {
    world: World,
    hero: Hero,
    scheduler: Scheduler,
    last_swept: usize,
}

impl GamePlayState {
    /// Create the scene with the hero at `hero_spawn`
    pub fn new(config: EngineConfig, tiles: TileMap, hero_spawn: Vec2) -> EcsResult<Self> {
        let mut world = World::new(config, tiles);
        let mut hero = Hero::new(hero_spawn, HERO_SIZE);
        hero.attach(&mut world.entities)?;

        let mut scheduler = Scheduler::new();
        add_gameplay_systems(&mut scheduler);

        Ok(GamePlayState {
            world,
            hero,
            scheduler,
            last_swept: 0,
        })
    }

    /// Simulation world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable simulation world, for spawning
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The hero
    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    /// Entities swept at the end of the last frame
    pub fn last_swept(&self) -> usize {
        self.last_swept
    }

    /// Run one frame of `dt` seconds with `input`
    pub fn step(&mut self, dt: f32, input: &InputState) -> EcsResult<()> {
        self.world.input.clone_from(input);

        let world = &mut self.world;
        self.hero.handle_input(&world.input, &world.entities, &world.config);
        self.hero.step_physics(&world.tiles, &world.input, dt, &world.config);
        self.hero.sync_to_pool(&mut world.entities)?;

        self.scheduler.run(world, dt)?;

        self.hero.absorb_combat(&world.damage, &world.entities)?;
        self.hero.update(&world.input, &world.config);

        self.last_swept = world.end_frame();
        Ok(())
    }

    fn draw_tiles(&self, ctx: &mut RenderContext) -> RenderResult<()> {
        let tiles = &self.world.tiles;
        let size = tiles.tile_size();
        for (column, row, tile) in tiles.occupied() {
            let color = match tile {
                TileType::Platform => Color::BURLY_WOOD,
                _ => Color::SLATE_GRAY,
            };
            ctx.draw_rect(column as f32 * size, row as f32 * size, size, size, color)?;
        }
        Ok(())
    }

    fn draw_entities(&self, ctx: &mut RenderContext) -> RenderResult<()> {
        let pool = &self.world.entities;
        let mut bodies = pool.query::<(Position, Health)>();
        while let Some(entity) = bodies.next(pool) {
            if Some(entity) == self.hero.entity() {
                continue;
            }
            let (Ok(position), Ok(health)) = (pool.get::<Position>(entity), pool.get::<Health>(entity)) else {
                continue;
            };
            let color = if pool.has::<Monster>(entity) {
                Color::CRIMSON
            } else if pool.has::<Bullet>(entity) {
                Color::GOLD
            } else {
                Color::CORNFLOWER_BLUE
            };
            ctx.draw_rect(position.x, position.y, health.width, health.height, color)?;
        }
        Ok(())
    }
}

impl GameState for GamePlayState {
    fn name(&self) -> &str {
        "GamePlay"
    }

    fn on_enter(&mut self) {
        log::info!(
            "gameplay started with {} entities on a {}x{} map",
            self.world.entities.len(),
            self.world.tiles.columns(),
            self.world.tiles.rows()
        );
    }

    fn on_exit(&mut self) {
        log::info!("gameplay ended after {} frames", self.world.frame());
    }

    fn update(&mut self, dt: f32, input: &InputState) -> EcsResult<Transition> {
        self.step(dt, input)?;
        Ok(Transition::None)
    }

    fn render(&mut self, ctx: &mut RenderContext) -> RenderResult<()> {
        ctx.clear(Color::WHITE)?;
        self.draw_tiles(ctx)?;
        self.draw_entities(ctx)?;
        self.hero.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::spawn::spawn_monster;
    use crate::ecs::LifecycleEvent;
    use crate::hero::HeroState;
    use crate::input::Key;
    use crate::render::{DrawCommand, RecordingBackend};

    const DT: f32 = 1.0 / 60.0;

    fn level() -> TileMap {
        TileMap::from_rows(
            &[
                "..........",
                "..........",
                "....==....",
                "..........",
                "##########",
            ],
            32.0,
        )
    }

    fn scene() -> GamePlayState {
        GamePlayState::new(EngineConfig::default(), level(), Vec2::new(32.0, 96.0)).unwrap()
    }

    #[test]
    fn test_new_attaches_hero() {
        let scene = scene();
        let proxy = scene.hero().entity().unwrap();
        assert!(scene.world().entities.is_alive(proxy));
        assert_eq!(scene.world().entities.len(), 1);
    }

    #[test]
    fn test_hero_settles_on_floor() {
        let mut scene = scene();
        let input = InputState::new();
        scene.step(DT, &input).unwrap();
        assert_eq!(scene.hero().state(), HeroState::Stand);
        assert_eq!(scene.hero().body().y(), 96.0);
        assert_eq!(scene.world().frame(), 1);
    }

    #[test]
    fn test_fire_spawns_and_expires_bullet() {
        let mut scene = scene();
        let mut input = InputState::new();
        input.press(Key::Fire);
        scene.step(DT, &input).unwrap();
        assert_eq!(scene.world().entities.len(), 2);

        input.clear_just();
        input.release(Key::Fire);
        let mut frames = 0;
        while scene.world().entities.len() > 1 && frames < 600 {
            scene.step(DT, &input).unwrap();
            frames += 1;
        }
        assert_eq!(scene.world().entities.len(), 1);
    }

    #[test]
    fn test_lifecycle_events_do_not_accumulate() {
        let mut scene = scene();
        let mut input = InputState::new();
        let mut spawned = 0;
        for frame in 0..4000 {
            input.clear_just();
            if frame % 2 == 0 {
                input.press(Key::Fire);
            } else {
                input.release(Key::Fire);
            }
            scene.step(DT, &input).unwrap();
            spawned += scene
                .world()
                .frame_events()
                .iter()
                .filter(|e| matches!(e, LifecycleEvent::Spawned(_)))
                .count();
            assert!(scene.world().frame_events().len() <= 2);
        }

        assert_eq!(spawned, 2000);
        assert!(scene.world_mut().entities.drain_events().is_empty());
    }

    #[test]
    fn test_monster_contact_knocks_hero_back() {
        let mut scene = scene();
        let input = InputState::new();
        scene.step(DT, &input).unwrap();

        let world = scene.world_mut();
        spawn_monster(
            &mut world.entities,
            Vec2::new(50.0, 96.0),
            Vec2::new(32.0, 32.0),
            10,
            Vec2::ZERO,
        )
        .unwrap();

        scene.step(DT, &input).unwrap();
        assert!(scene.hero().body().velocity_x() < 0.0);
        assert_eq!(scene.hero().state(), HeroState::Fall);
        let proxy = scene.hero().entity().unwrap();
        assert!(!scene.hero().has_control(&scene.world().entities));

        scene.step(DT, &input).unwrap();
        assert!(scene.world().entities.is_alive(proxy));
    }

    #[test]
    fn test_render_draws_background_tiles_and_hero() {
        let backend = RecordingBackend::new();
        let recorder = backend.recorder();
        let mut ctx = RenderContext::new(Box::new(backend), 320, 160);
        let mut scene = scene();

        ctx.begin_draw().unwrap();
        scene.render(&mut ctx).unwrap();
        ctx.end_draw().unwrap();

        let frame = recorder.last_frame().unwrap();
        assert_eq!(frame[0], DrawCommand::Clear(Color::WHITE));
        // 10 floor tiles, 2 platform tiles, the hero
        assert_eq!(frame.len(), 1 + 12 + 1);
        let platforms = frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == Color::BURLY_WOOD))
            .count();
        assert_eq!(platforms, 2);
        assert!(matches!(
            frame.last(),
            Some(DrawCommand::FillRect { color, .. }) if *color == Color::CORNFLOWER_BLUE
        ));
    }
}
