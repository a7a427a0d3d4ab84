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
//! The player character
//!
//! The hero lives outside the entity pool: it owns a [`PhysicalBody`] that
//! the tile collider moves, and a [`HeroState`] that turns key events and
//! collision results into movement. To take part in combat it keeps a
//! proxy entity in the pool carrying its hit box.
//!
//! Per frame the owner calls, in order:
//! 1. [`handle_input`](Hero::handle_input): key-down events
//! 2. [`step_physics`](Hero::step_physics): tile collision, landing event
//! 3. [`sync_to_pool`](Hero::sync_to_pool): publish the hit box
//! 4. ECS systems
//! 5. [`absorb_combat`](Hero::absorb_combat) and [`update`](Hero::update)

mod state;

pub use state::{HeroContext, HeroState};

use crate::config::EngineConfig;
use crate::ecs::{Entity, EntityPool};
use crate::error::{EcsResult, RenderResult};
use crate::game::components::{Direction, Facing, InputControl, Position, Velocity};
use crate::game::spawn::spawn_player;
use crate::game::systems::DamageReport;
use crate::input::{InputState, Key};
use crate::physics::{PhysicalBody, StepOutcome, TileCollider, TileMap};
use crate::render::RenderContext;
use glam::Vec2;

/// Default hero health
pub const HERO_HEALTH: i32 = 100;

/// Player character driven by a state machine
#[derive(Debug, Clone)]
pub struct Hero {
    body: PhysicalBody,
    state: HeroState,
    facing: Direction,
    entity: Option<Entity>,
}

impl Hero {
    /// Create a hero standing at `position`
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Hero {
            body: PhysicalBody::new(position, size),
            state: HeroState::Stand,
            facing: Direction::Right,
            entity: None,
        }
    }

    /// Spawn the hero's combat proxy in `pool`
    pub fn attach(&mut self, pool: &mut EntityPool) -> EcsResult<Entity> {
        let entity = spawn_player(pool, self.body.position(), self.body.size(), HERO_HEALTH)?;
        self.entity = Some(entity);
        Ok(entity)
    }

    /// Current state
    pub fn state(&self) -> HeroState {
        self.state
    }

    /// Physical body
    pub fn body(&self) -> &PhysicalBody {
        &self.body
    }

    /// Mutable physical body
    pub fn body_mut(&mut self) -> &mut PhysicalBody {
        &mut self.body
    }

    /// Direction the hero looks
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Combat proxy, if attached
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    /// Whether the proxy's input control is enabled
    ///
    /// A hero without a proxy is always in control.
    pub fn has_control(&self, pool: &EntityPool) -> bool {
        match self.entity {
            Some(entity) => pool.is_enabled::<InputControl>(entity),
            None => true,
        }
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Left key went down
    pub fn on_left_key_down(&mut self, config: &EngineConfig) {
        self.facing = Direction::Left;
        self.steer(Direction::Left, config);
        let next = self.state.on_left_key_down();
        self.transition(next, config);
    }

    /// Right key went down
    pub fn on_right_key_down(&mut self, config: &EngineConfig) {
        self.facing = Direction::Right;
        self.steer(Direction::Right, config);
        let next = self.state.on_right_key_down();
        self.transition(next, config);
    }

    /// Jump key went down
    pub fn on_jump_key_down(&mut self, config: &EngineConfig) {
        let next = self.state.on_jump_key_down();
        self.transition(next, config);
    }

    /// The body landed
    pub fn on_land(&mut self, config: &EngineConfig) {
        let next = self.state.on_land();
        self.transition(next, config);
    }

    fn steer(&mut self, direction: Direction, config: &EngineConfig) {
        if self.state.is_airborne() {
            self.body.set_velocity_x(direction.sign() * config.air_control_speed);
        }
    }

    /// Feed this frame's key-down events in arrival order
    ///
    /// Ignored entirely while the proxy's input control is disabled.
    pub fn handle_input(&mut self, input: &InputState, pool: &EntityPool, config: &EngineConfig) {
        if !self.has_control(pool) {
            log::trace!("hero input ignored while stunned");
            return;
        }
        for &key in input.key_downs() {
            match key {
                Key::Left => self.on_left_key_down(config),
                Key::Right => self.on_right_key_down(config),
                Key::Jump => self.on_jump_key_down(config),
                Key::Fire => {}
            }
        }
    }

    /// Move the body through the tile map
    ///
    /// Fires the landing event before returning, so the following
    /// [`update`](Self::update) sees this frame's ground contact. Keys still
    /// held on landing carry straight into a walk.
    pub fn step_physics(
        &mut self,
        tiles: &TileMap,
        input: &InputState,
        dt: f32,
        config: &EngineConfig,
    ) -> StepOutcome {
        let outcome = TileCollider::step(&mut self.body, tiles, dt, config);
        if outcome.landed {
            self.on_land(config);
            if let Some(direction) = held_direction(input) {
                let next = match direction {
                    Direction::Left => self.state.on_left_key_down(),
                    Direction::Right => self.state.on_right_key_down(),
                };
                self.transition(next, config);
            }
        }
        outcome
    }

    /// Per-frame state transition
    pub fn update(&mut self, input: &InputState, config: &EngineConfig) {
        let ctx = HeroContext {
            on_ground: self.body.is_on_land(),
            velocity_y: self.body.velocity_y(),
            left_held: input.pressed(Key::Left),
            right_held: input.pressed(Key::Right),
        };
        let next = self.state.update(&ctx);
        self.transition(next, config);
    }

    fn transition(&mut self, next: HeroState, config: &EngineConfig) {
        if next == self.state {
            return;
        }
        log::debug!("hero {:?} -> {:?}", self.state, next);
        self.state = next;
        match next {
            HeroState::Stand => self.body.set_velocity_x(0.0),
            HeroState::Walk(direction) => {
                self.facing = direction;
                self.body.set_velocity_x(direction.sign() * config.walk_speed);
            }
            HeroState::Jump => {
                self.body.jump(config.jump_speed);
            }
            HeroState::Fall => {}
        }
    }

    // ── Combat proxy ────────────────────────────────────────────────────

    /// Publish position and facing to the proxy and zero its velocity
    ///
    /// The proxy's velocity only carries knockback written by the combat
    /// pass back to the hero.
    pub fn sync_to_pool(&self, pool: &mut EntityPool) -> EcsResult<()> {
        let Some(entity) = self.entity else {
            return Ok(());
        };
        if !pool.is_alive(entity) {
            return Ok(());
        }
        *pool.get_mut::<Position>(entity)? = Position::from(self.body.position());
        *pool.get_mut::<Velocity>(entity)? = Velocity::default();
        *pool.get_mut::<Facing>(entity)? = Facing(self.facing);
        Ok(())
    }

    /// Apply knockback the combat pass gave the proxy
    pub fn absorb_combat(&mut self, report: &DamageReport, pool: &EntityPool) -> EcsResult<()> {
        let Some(entity) = self.entity else {
            return Ok(());
        };
        if report.knockback_for(entity).is_some() {
            let impulse = pool.get::<Velocity>(entity)?;
            self.body.set_velocity_x(impulse.x);
            self.body.set_velocity_y(impulse.y);
            self.body.set_on_land_flag(false);
        }
        Ok(())
    }

    /// Draw the hero in its state color
    pub fn render(&self, ctx: &mut RenderContext) -> RenderResult<()> {
        let pos = self.body.position();
        let size = self.body.size();
        ctx.draw_rect(pos.x, pos.y, size.x, size.y, self.state.color())
    }
}

fn held_direction(input: &InputState) -> Option<Direction> {
    match input.horizontal_axis() {
        a if a < 0.0 => Some(Direction::Left),
        a if a > 0.0 => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::systems::Knockback;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> TileMap {
        TileMap::from_rows(&["..........", "..........", "..........", "##########"], 32.0)
    }

    fn grounded_hero(config: &EngineConfig, map: &TileMap) -> Hero {
        let mut hero = Hero::new(Vec2::new(64.0, 64.0), Vec2::new(24.0, 32.0));
        let input = InputState::new();
        hero.step_physics(map, &input, DT, config);
        hero.update(&input, &config);
        hero
    }

    #[test]
    fn test_jump_from_stand() {
        let config = EngineConfig::default();
        let map = floor();
        let mut hero = grounded_hero(&config, &map);
        assert_eq!(hero.state(), HeroState::Stand);
        assert!(hero.body().is_on_land());

        hero.on_jump_key_down(&config);
        assert_eq!(hero.state(), HeroState::Jump);
        assert_eq!(hero.body().velocity_y(), -config.jump_speed);
    }

    #[test]
    fn test_full_jump_cycle() {
        let config = EngineConfig::default();
        let map = floor();
        let mut hero = grounded_hero(&config, &map);
        let input = InputState::new();

        hero.on_jump_key_down(&config);
        let mut seen_fall = false;
        for _ in 0..120 {
            hero.step_physics(&map, &input, DT, &config);
            hero.update(&input, &config);
            seen_fall |= hero.state() == HeroState::Fall;
        }
        assert!(seen_fall);
        assert_eq!(hero.state(), HeroState::Stand);
        assert_eq!(hero.body().y(), 64.0);
    }

    #[test]
    fn test_walk_and_stop() {
        let config = EngineConfig::default();
        let map = floor();
        let mut hero = grounded_hero(&config, &map);
        let mut input = InputState::new();

        input.press(Key::Right);
        let pool = EntityPool::new();
        hero.handle_input(&input, &pool, &config);
        assert_eq!(hero.state(), HeroState::Walk(Direction::Right));
        assert_eq!(hero.body().velocity_x(), config.walk_speed);

        input.clear_just();
        hero.step_physics(&map, &input, DT, &config);
        hero.update(&input, &config);
        assert_eq!(hero.state(), HeroState::Walk(Direction::Right));
        assert!(hero.body().x() > 64.0);

        input.release(Key::Right);
        hero.step_physics(&map, &input, DT, &config);
        hero.update(&input, &config);
        assert_eq!(hero.state(), HeroState::Stand);
        assert_eq!(hero.body().velocity_x(), 0.0);
    }

    #[test]
    fn test_walking_off_ledge_falls() {
        let config = EngineConfig::default();
        let map = TileMap::from_rows(&["....", "....", "##..", "...."], 32.0);
        let mut hero = Hero::new(Vec2::new(30.0, 32.0), Vec2::new(24.0, 32.0));
        let mut input = InputState::new();
        hero.step_physics(&map, &input, DT, &config);
        hero.update(&input, &config);
        assert_eq!(hero.state(), HeroState::Stand);

        input.press(Key::Right);
        let pool = EntityPool::new();
        hero.handle_input(&input, &pool, &config);
        input.clear_just();

        let mut fell = false;
        for _ in 0..30 {
            hero.step_physics(&map, &input, DT, &config);
            hero.update(&input, &config);
            fell |= hero.state() == HeroState::Fall;
        }
        assert!(fell);
    }

    #[test]
    fn test_stunned_hero_ignores_keys() {
        let config = EngineConfig::default();
        let map = floor();
        let mut hero = grounded_hero(&config, &map);
        let mut pool = EntityPool::new();
        let proxy = hero.attach(&mut pool).unwrap();
        pool.disable::<InputControl>(proxy).unwrap();

        let mut input = InputState::new();
        input.press(Key::Jump);
        hero.handle_input(&input, &pool, &config);
        assert_eq!(hero.state(), HeroState::Stand);
    }

    #[test]
    fn test_knockback_reaches_body() {
        let config = EngineConfig::default();
        let map = floor();
        let mut hero = grounded_hero(&config, &map);
        let mut pool = EntityPool::new();
        let proxy = hero.attach(&mut pool).unwrap();
        hero.sync_to_pool(&mut pool).unwrap();

        pool.get_mut::<Velocity>(proxy).unwrap().x = -config.knockback_speed;
        pool.get_mut::<Velocity>(proxy).unwrap().y = -config.knockback_lift;
        let report = DamageReport {
            knockbacks: vec![Knockback {
                player: proxy,
                monster: proxy,
                direction: Direction::Left,
            }],
            ..DamageReport::default()
        };
        hero.absorb_combat(&report, &pool).unwrap();
        assert_eq!(hero.body().velocity_x(), -config.knockback_speed);

        let input = InputState::new();
        hero.step_physics(&map, &input, DT, &config);
        hero.update(&input, &config);
        assert_eq!(hero.state(), HeroState::Fall);
    }

    #[test]
    fn test_sync_publishes_position() {
        let mut pool = EntityPool::new();
        let mut hero = Hero::new(Vec2::new(10.0, 20.0), Vec2::new(24.0, 32.0));
        let proxy = hero.attach(&mut pool).unwrap();
        hero.body_mut().set_x(50.0);
        hero.on_left_key_down(&EngineConfig::default());
        hero.sync_to_pool(&mut pool).unwrap();

        assert_eq!(pool.get::<Position>(proxy).unwrap().x, 50.0);
        assert_eq!(pool.get::<Facing>(proxy).unwrap().0, Direction::Left);
    }
}
