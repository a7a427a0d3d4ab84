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
//! Reusable entity behaviors

use crate::config::EngineConfig;
use crate::ecs::{Entity, EntityPool};
use crate::error::EcsResult;
use crate::game::components::{Direction, Velocity};

/// Knock an entity away in `direction`
///
/// Replaces the entity's velocity with a horizontal push of
/// `knockback_speed` and an upward hop of `knockback_lift`.
pub fn repel(
    pool: &mut EntityPool,
    entity: Entity,
    direction: Direction,
    config: &EngineConfig,
) -> EcsResult<()> {
    let velocity = pool.get_mut::<Velocity>(entity)?;
    velocity.x = direction.sign() * config.knockback_speed;
    velocity.y = -config.knockback_lift;
    log::trace!("{} repelled {:?}", entity, direction);
    Ok(())
}

/// Direction that pushes the entity at `x` away from an obstacle at `other_x`
///
/// An entity left of the obstacle goes left; otherwise it goes right.
pub fn away_from(x: f32, other_x: f32) -> Direction {
    if x < other_x {
        Direction::Left
    } else {
        Direction::Right
    }
}
