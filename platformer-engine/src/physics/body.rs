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
//! Physical body of a tile-colliding character
//!
//! A [`PhysicalBody`] is the state the hero keeps outside the entity pool:
//! position, velocity, collision box and the per-side obstruction flags
//! written by the tile collider. The flags are cleared at the start of every
//! collision step and rebuilt from that step's contacts only.

use crate::physics::tiles::{CollisionSide, TileType};
use glam::Vec2;

/// Sides on which terrain blocked the body during the last collision step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObstructFlags {
    /// Blocked while moving left
    pub left: bool,
    /// Blocked while moving right
    pub right: bool,
    /// Blocked while moving up
    pub up: bool,
    /// Blocked while moving down
    pub down: bool,
}

impl ObstructFlags {
    /// Whether any side is blocked
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    fn set(&mut self, side: CollisionSide) {
        match side {
            CollisionSide::Left => self.left = true,
            CollisionSide::Right => self.right = true,
            CollisionSide::Up => self.up = true,
            CollisionSide::Down => self.down = true,
        }
    }
}

/// Kinematic state of a character colliding with the tile map
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use platformer_engine::physics::PhysicalBody;
///
/// let mut body = PhysicalBody::new(Vec2::new(64.0, 0.0), Vec2::new(24.0, 32.0));
/// body.move_right(200.0);
/// assert_eq!(body.velocity_x(), 200.0);
/// assert!(!body.jump(500.0)); // airborne bodies cannot jump
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalBody {
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    obstructive: bool,
    gravity: bool,
    obstruct: ObstructFlags,
    on_land: bool,
}

impl PhysicalBody {
    /// Create an obstructive, gravity-bound body at rest
    pub fn new(position: Vec2, size: Vec2) -> Self {
        PhysicalBody {
            position,
            velocity: Vec2::ZERO,
            size,
            obstructive: true,
            gravity: true,
            obstruct: ObstructFlags::default(),
            on_land: false,
        }
    }

    /// Set whether terrain blocks the body
    pub fn with_obstructive(mut self, obstructive: bool) -> Self {
        self.obstructive = obstructive;
        self
    }

    /// Set whether gravity applies
    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    // ── Movement intents ────────────────────────────────────────────────

    /// Move left at `speed`
    pub fn move_left(&mut self, speed: f32) {
        self.velocity.x = -speed;
    }

    /// Move right at `speed`
    pub fn move_right(&mut self, speed: f32) {
        self.velocity.x = speed;
    }

    /// Move up at `speed`
    pub fn move_up(&mut self, speed: f32) {
        self.velocity.y = -speed;
    }

    /// Move down at `speed`
    pub fn move_down(&mut self, speed: f32) {
        self.velocity.y = speed;
    }

    /// Launch upwards at `speed` if standing on ground
    ///
    /// Returns whether the jump happened.
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.on_land {
            return false;
        }
        self.velocity.y = -speed;
        self.on_land = false;
        true
    }

    /// Settle on the ground: vertical motion stops
    pub fn on_land(&mut self) {
        self.on_land = true;
        self.velocity.y = 0.0;
    }

    // ── Collision ───────────────────────────────────────────────────────

    /// Report contact with `tile` on `side`
    ///
    /// Returns whether the tile blocks the body from that side; a blocking
    /// contact raises the matching obstruction flag. Platforms block only
    /// from above.
    pub fn take_tile_collision(&mut self, side: CollisionSide, tile: TileType) -> bool {
        if !self.obstructive {
            return false;
        }
        let blocked = match tile {
            TileType::Solid => true,
            TileType::Platform => side == CollisionSide::Down,
            TileType::Empty => false,
        };
        if blocked {
            self.obstruct.set(side);
        }
        blocked
    }

    /// Drop all obstruction flags
    pub fn clear_obstruct_flags(&mut self) {
        self.obstruct = ObstructFlags::default();
    }

    /// Obstruction flags from the last collision step
    pub fn obstruct_flags(&self) -> ObstructFlags {
        self.obstruct
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Horizontal coordinate
    pub fn x(&self) -> f32 {
        self.position.x
    }

    /// Vertical coordinate
    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// Set the horizontal coordinate
    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    /// Set the vertical coordinate
    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    /// Velocity in px/s
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Horizontal velocity
    pub fn velocity_x(&self) -> f32 {
        self.velocity.x
    }

    /// Vertical velocity
    pub fn velocity_y(&self) -> f32 {
        self.velocity.y
    }

    /// Set the horizontal velocity
    pub fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    /// Set the vertical velocity
    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    /// Collision box size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Collision box width
    pub fn collision_width(&self) -> f32 {
        self.size.x
    }

    /// Collision box height
    pub fn collision_height(&self) -> f32 {
        self.size.y
    }

    /// Whether terrain blocks the body
    pub fn is_obstructive(&self) -> bool {
        self.obstructive
    }

    /// Whether gravity applies
    pub fn has_gravity(&self) -> bool {
        self.gravity
    }

    /// Whether the body stood on ground after the last collision step
    pub fn is_on_land(&self) -> bool {
        self.on_land
    }

    /// Overwrite the on-ground flag
    pub fn set_on_land_flag(&mut self, flag: bool) {
        self.on_land = flag;
    }
}
