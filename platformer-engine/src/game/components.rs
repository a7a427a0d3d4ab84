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
//! Gameplay components
//!
//! Plain data records attached to entities in the [`EntityPool`]. None of
//! them carry behavior; systems read and write them in place.
//!
//! Coordinates are screen space: `x` grows to the right, `y` grows down,
//! and a [`Position`] names the top-left corner of the entity's box.
//!
//! [`EntityPool`]: crate::ecs::EntityPool

use crate::ecs::Component;
use glam::Vec2;

/// Top-left corner of an entity's box
///
/// # Examples
///
/// ```
/// use platformer_engine::game::components::Position;
///
/// let pos = Position::new(16.0, 32.0);
/// assert_eq!(pos.x, 16.0);
/// assert!(pos.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Position {
    /// Create a new position
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    /// Position as a vector
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Check if both coordinates are finite
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Position::new(v.x, v.y)
    }
}

impl Component for Position {}

/// Velocity in pixels per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    /// Horizontal speed
    pub x: f32,
    /// Vertical speed, positive downwards
    pub y: f32,
}

impl Velocity {
    /// Create a new velocity
    pub fn new(x: f32, y: f32) -> Self {
        Velocity { x, y }
    }

    /// Velocity as a vector
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Velocity {
    fn from(v: Vec2) -> Self {
        Velocity::new(v.x, v.y)
    }
}

impl Component for Velocity {}

/// Health pool and hit box of a combatant
///
/// The hit box extends `width` to the right and `height` downwards from the
/// entity's [`Position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// Remaining health; the entity dies at zero or below
    pub power: i32,
    /// Hit box width
    pub width: f32,
    /// Hit box height
    pub height: f32,
}

impl Health {
    /// Create a health record with the given hit box
    pub fn new(power: i32, width: f32, height: f32) -> Self {
        Health {
            power,
            width,
            height,
        }
    }

    /// Hit box size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether health is exhausted
    pub fn is_depleted(&self) -> bool {
        self.power <= 0
    }
}

impl Component for Health {}

/// A projectile fired by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    /// Health removed from a monster on hit
    pub damage: i32,
}

impl Bullet {
    /// Create a bullet dealing `damage`
    pub fn new(damage: i32) -> Self {
        Bullet { damage }
    }
}

impl Component for Bullet {}

/// Marks the player-controlled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player;

impl Component for Player {}

/// Marks a hostile entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Monster;

impl Component for Monster {}

/// Present and enabled while the entity obeys keyboard input
///
/// Knockback disables it for the rest of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputControl;

impl Component for InputControl {}

/// Entity is pulled down by gravity during movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gravity;

impl Component for Gravity {}

/// Seconds until the entity expires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Remaining time in seconds
    pub remaining: f32,
}

impl Lifetime {
    /// Create a lifetime of `seconds`
    pub fn new(seconds: f32) -> Self {
        Lifetime { remaining: seconds }
    }
}

impl Component for Lifetime {}

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Towards negative x
    Left,
    /// Towards positive x
    #[default]
    Right,
}

impl Direction {
    /// -1 for left, 1 for right
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// The other direction
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Direction an entity is looking; bullets leave this way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Facing(pub Direction);

impl Component for Facing {}
