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
//! Entity archetypes
//!
//! Each function creates an entity and attaches the component set that
//! the systems expect for that kind of actor.

use crate::config::EngineConfig;
use crate::ecs::{Entity, EntityPool};
use crate::error::EcsResult;
use crate::game::components::{
    Bullet, Direction, Facing, Gravity, Health, InputControl, Lifetime, Monster, Player, Position,
    Velocity,
};
use glam::Vec2;

/// Spawn a keyboard-controlled player
pub fn spawn_player(pool: &mut EntityPool, position: Vec2, size: Vec2, power: i32) -> EcsResult<Entity> {
    let entity = pool.create();
    pool.set(entity, Position::from(position))?;
    pool.set(entity, Velocity::default())?;
    pool.set(entity, Health::new(power, size.x, size.y))?;
    pool.set(entity, Player)?;
    pool.set(entity, InputControl)?;
    pool.set(entity, Facing(Direction::Right))?;
    log::debug!("spawned player {}", entity);
    Ok(entity)
}

/// Spawn a gravity-bound monster walking at `velocity`
pub fn spawn_monster(
    pool: &mut EntityPool,
    position: Vec2,
    size: Vec2,
    power: i32,
    velocity: Vec2,
) -> EcsResult<Entity> {
    let entity = pool.create();
    pool.set(entity, Position::from(position))?;
    pool.set(entity, Velocity::from(velocity))?;
    pool.set(entity, Health::new(power, size.x, size.y))?;
    pool.set(entity, Monster)?;
    pool.set(entity, Gravity)?;
    log::debug!("spawned monster {} with {} health", entity, power);
    Ok(entity)
}

/// Spawn a player bullet at `position` flying towards `direction`
///
/// Speed, size, damage and lifetime come from `config`.
pub fn spawn_bullet(
    pool: &mut EntityPool,
    position: Vec2,
    direction: Direction,
    config: &EngineConfig,
) -> EcsResult<Entity> {
    let entity = pool.create();
    pool.set(entity, Position::from(position))?;
    pool.set(entity, Velocity::new(direction.sign() * config.bullet_speed, 0.0))?;
    pool.set(entity, Health::new(1, config.bullet_size, config.bullet_size))?;
    pool.set(entity, Bullet::new(config.bullet_damage))?;
    pool.set(entity, Lifetime::new(config.bullet_lifetime))?;
    log::trace!("spawned bullet {}", entity);
    Ok(entity)
}
