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
//! Tile map and tile collision
//!
//! The [`TileMap`] is a static grid built once before play starts. The
//! [`TileCollider`] moves a [`PhysicalBody`] through it one step at a time,
//! resolving the horizontal axis before the vertical one.
//!
//! # Collision step
//!
//! 1. Clear the body's obstruction flags and on-ground flag
//! 2. Apply gravity, clamped to the terminal velocity
//! 3. Split the displacement into sub-steps no longer than half a tile
//! 4. Per sub-step, move along x and snap against blocking tiles, then y
//!
//! Cells outside the map are treated as solid, so bodies cannot leave it.

use crate::config::EngineConfig;
use crate::physics::body::PhysicalBody;

/// Slack used to keep a box that touches a tile edge out of that tile
const EDGE_EPSILON: f32 = 1e-3;

/// Kind of a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileType {
    /// Free space
    #[default]
    Empty,
    /// Blocks from every side
    Solid,
    /// One-way floor: blocks only bodies landing from above
    Platform,
}

/// Side of a body that touched a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionSide {
    /// Left edge, while moving left
    Left,
    /// Right edge, while moving right
    Right,
    /// Top edge, while moving up
    Up,
    /// Bottom edge, while moving down
    Down,
}

/// Static grid of tiles
///
/// # Examples
///
/// ```
/// use platformer_engine::physics::{TileMap, TileType};
///
/// let map = TileMap::from_rows(&["....", "..==", "####"], 32.0);
/// assert_eq!(map.tile_at(70.0, 40.0), TileType::Platform);
/// assert_eq!(map.tile_at(10.0, 70.0), TileType::Solid);
/// assert_eq!(map.tile_at(-1.0, 0.0), TileType::Solid); // outside the map
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    columns: usize,
    rows: usize,
    tile_size: f32,
    tiles: Vec<TileType>,
}

impl TileMap {
    /// Create an empty map of `columns` x `rows` cells
    pub fn new(columns: usize, rows: usize, tile_size: f32) -> Self {
        TileMap {
            columns,
            rows,
            tile_size,
            tiles: vec![TileType::Empty; columns * rows],
        }
    }

    /// Build a map from text rows
    ///
    /// `#` is solid, `=` is a platform and anything else is empty. Short
    /// rows are padded with empty cells.
    pub fn from_rows(rows: &[&str], tile_size: f32) -> Self {
        let columns = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut map = TileMap::new(columns, rows.len(), tile_size);
        for (row, line) in rows.iter().enumerate() {
            for (column, c) in line.chars().enumerate() {
                let tile = match c {
                    '#' => TileType::Solid,
                    '=' => TileType::Platform,
                    _ => TileType::Empty,
                };
                map.set(column, row, tile);
            }
        }
        map
    }

    /// Overwrite one cell; out-of-range cells are ignored
    pub fn set(&mut self, column: usize, row: usize, tile: TileType) {
        if column < self.columns && row < self.rows {
            self.tiles[row * self.columns + column] = tile;
        }
    }

    /// Tile at a grid cell; cells outside the map are solid
    pub fn get(&self, column: i32, row: i32) -> TileType {
        if column < 0 || row < 0 {
            return TileType::Solid;
        }
        let (column, row) = (column as usize, row as usize);
        if column >= self.columns || row >= self.rows {
            return TileType::Solid;
        }
        self.tiles[row * self.columns + column]
    }

    /// Tile under a world coordinate
    pub fn tile_at(&self, x: f32, y: f32) -> TileType {
        self.get(self.cell(x), self.cell(y))
    }

    /// Grid index containing world coordinate `v` on either axis
    pub fn cell(&self, v: f32) -> i32 {
        (v / self.tile_size).floor() as i32
    }

    /// Edge length of a cell
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width and height in world units
    pub fn world_size(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.tile_size,
            self.rows as f32 * self.tile_size,
        )
    }

    /// Non-empty cells as `(column, row, tile)`, row by row
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, TileType)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile != TileType::Empty)
            .map(move |(i, tile)| (i % self.columns, i / self.columns, *tile))
    }
}

/// What happened to a body during one collision step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// The body touched ground this step after being airborne
    pub landed: bool,
    /// The body stands on ground after this step
    pub on_ground: bool,
    /// A wall stopped horizontal motion
    pub hit_wall: bool,
    /// A ceiling stopped upward motion
    pub hit_ceiling: bool,
}

/// Moves bodies through a [`TileMap`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TileCollider;

impl TileCollider {
    /// Advance `body` by `dt` seconds against `map`
    pub fn step(body: &mut PhysicalBody, map: &TileMap, dt: f32, config: &EngineConfig) -> StepOutcome {
        let was_on_land = body.is_on_land();
        body.clear_obstruct_flags();
        body.set_on_land_flag(false);

        if body.has_gravity() {
            let vy = (body.velocity_y() + config.gravity * dt).min(config.terminal_velocity);
            body.set_velocity_y(vy);
        }

        let delta = body.velocity() * dt;
        let mut outcome = StepOutcome::default();

        if !body.is_obstructive() {
            body.set_x(body.x() + delta.x);
            body.set_y(body.y() + delta.y);
            return outcome;
        }

        let max_step = map.tile_size() * 0.5;
        let steps = (delta.abs().max_element() / max_step).ceil().max(1.0) as u32;
        let sub = delta / steps as f32;

        for _ in 0..steps {
            if sub.x != 0.0 && !outcome.hit_wall {
                outcome.hit_wall = Self::resolve_x(body, map, sub.x);
            }
            if sub.y != 0.0 && !(outcome.on_ground || outcome.hit_ceiling) {
                match Self::resolve_y(body, map, sub.y) {
                    Some(CollisionSide::Down) => outcome.on_ground = true,
                    Some(_) => outcome.hit_ceiling = true,
                    None => {}
                }
            }
        }

        outcome.landed = outcome.on_ground && !was_on_land;
        if outcome.landed {
            log::trace!("body landed at ({:.1}, {:.1})", body.x(), body.y());
        }
        outcome
    }

    /// Move along x; returns whether a wall blocked the move
    fn resolve_x(body: &mut PhysicalBody, map: &TileMap, dx: f32) -> bool {
        let ts = map.tile_size();
        let size = body.size();
        let mut new_x = body.x() + dx;

        let (side, column) = if dx > 0.0 {
            (CollisionSide::Right, map.cell(new_x + size.x - EDGE_EPSILON))
        } else {
            (CollisionSide::Left, map.cell(new_x))
        };
        let top = map.cell(body.y());
        let bottom = map.cell(body.y() + size.y - EDGE_EPSILON);

        let mut blocked = false;
        for row in top..=bottom {
            blocked |= body.take_tile_collision(side, map.get(column, row));
        }

        if blocked {
            new_x = match side {
                CollisionSide::Right => column as f32 * ts - size.x,
                _ => (column + 1) as f32 * ts,
            };
            body.set_velocity_x(0.0);
        }
        body.set_x(new_x);
        blocked
    }

    /// Move along y; returns the blocked side, if any
    fn resolve_y(body: &mut PhysicalBody, map: &TileMap, dy: f32) -> Option<CollisionSide> {
        let ts = map.tile_size();
        let size = body.size();
        let old_bottom = body.y() + size.y;
        let mut new_y = body.y() + dy;

        let (side, row) = if dy > 0.0 {
            (CollisionSide::Down, map.cell(new_y + size.y - EDGE_EPSILON))
        } else {
            (CollisionSide::Up, map.cell(new_y))
        };
        let left = map.cell(body.x());
        let right = map.cell(body.x() + size.x - EDGE_EPSILON);
        let row_top = row as f32 * ts;

        let mut blocked = false;
        for column in left..=right {
            let tile = map.get(column, row);
            // Platforms only catch bodies that started above them
            if tile == TileType::Platform && old_bottom > row_top + EDGE_EPSILON {
                continue;
            }
            blocked |= body.take_tile_collision(side, tile);
        }

        if !blocked {
            body.set_y(new_y);
            return None;
        }

        match side {
            CollisionSide::Down => {
                new_y = row_top - size.y;
                body.set_y(new_y);
                body.on_land();
            }
            _ => {
                new_y = row_top + ts;
                body.set_y(new_y);
                body.set_velocity_y(0.0);
            }
        }
        Some(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn arena() -> TileMap {
        TileMap::from_rows(
            &[
                "..........",
                "..........",
                "......==..",
                "..........",
                "#.........",
                "##########",
            ],
            32.0,
        )
    }

    #[test]
    fn test_map_lookup() {
        let map = arena();
        assert_eq!(map.columns(), 10);
        assert_eq!(map.rows(), 6);
        assert_eq!(map.get(0, 5), TileType::Solid);
        assert_eq!(map.get(6, 2), TileType::Platform);
        assert_eq!(map.get(3, 3), TileType::Empty);
        assert_eq!(map.get(10, 0), TileType::Solid);
        assert_eq!(map.get(0, -1), TileType::Solid);
        assert_eq!(map.world_size(), (320.0, 192.0));
    }

    #[test]
    fn test_occupied_cells() {
        let map = TileMap::from_rows(&["#.", ".="], 16.0);
        let cells: Vec<_> = map.occupied().collect();
        assert_eq!(cells, vec![(0, 0, TileType::Solid), (1, 1, TileType::Platform)]);
    }

    #[test]
    fn test_body_falls_and_lands() {
        let map = arena();
        let config = EngineConfig::default();
        let mut body = PhysicalBody::new(Vec2::new(96.0, 0.0), Vec2::new(24.0, 32.0));

        let mut landed_frames = 0;
        for _ in 0..120 {
            let outcome = TileCollider::step(&mut body, &map, DT, &config);
            if outcome.landed {
                landed_frames += 1;
            }
        }

        assert_eq!(landed_frames, 1);
        assert!(body.is_on_land());
        assert!(body.obstruct_flags().down);
        assert_eq!(body.y(), 5.0 * 32.0 - 32.0);
        assert_eq!(body.velocity_y(), 0.0);
    }

    #[test]
    fn test_flags_do_not_persist() {
        let map = arena();
        let config = EngineConfig::default();
        let mut body = PhysicalBody::new(Vec2::new(96.0, 128.0), Vec2::new(24.0, 32.0));
        TileCollider::step(&mut body, &map, DT, &config);
        assert!(body.obstruct_flags().down);

        // Jump: the next step must not keep last frame's down flag
        assert!(body.jump(config.jump_speed));
        let outcome = TileCollider::step(&mut body, &map, DT, &config);
        assert!(!outcome.on_ground);
        assert!(!body.obstruct_flags().any());
        assert!(!body.is_on_land());
    }

    #[test]
    fn test_wall_blocks_horizontal_motion() {
        let map = arena();
        let config = EngineConfig::default();
        let mut body = PhysicalBody::new(Vec2::new(40.0, 128.0), Vec2::new(24.0, 32.0));
        body.move_left(config.walk_speed);

        let mut hit = false;
        for _ in 0..30 {
            hit |= TileCollider::step(&mut body, &map, DT, &config).hit_wall;
            body.move_left(config.walk_speed);
        }
        assert!(hit);
        assert_eq!(body.x(), 32.0);
        assert!(body.obstruct_flags().left);
    }

    #[test]
    fn test_platform_is_one_way() {
        let map = arena();
        let config = EngineConfig::default();

        // From below: passes through the platform row
        let mut body = PhysicalBody::new(Vec2::new(196.0, 100.0), Vec2::new(24.0, 24.0));
        body.set_velocity_y(-400.0);
        let outcome = TileCollider::step(&mut body, &map, DT, &config);
        assert!(!outcome.hit_ceiling);

        // From above: lands on top of it
        let mut body = PhysicalBody::new(Vec2::new(196.0, 20.0), Vec2::new(24.0, 24.0));
        let mut landed = false;
        for _ in 0..60 {
            landed |= TileCollider::step(&mut body, &map, DT, &config).landed;
        }
        assert!(landed);
        assert_eq!(body.y(), 2.0 * 32.0 - 24.0);
    }

    #[test]
    fn test_terminal_velocity() {
        let map = TileMap::new(4, 400, 32.0);
        let config = EngineConfig::default();
        let mut body = PhysicalBody::new(Vec2::new(32.0, 0.0), Vec2::new(16.0, 16.0));
        for _ in 0..240 {
            TileCollider::step(&mut body, &map, DT, &config);
        }
        assert_eq!(body.velocity_y(), config.terminal_velocity);
    }

    #[test]
    fn test_non_obstructive_body_ignores_tiles() {
        let map = arena();
        let config = EngineConfig::default();
        let mut body = PhysicalBody::new(Vec2::new(96.0, 150.0), Vec2::new(24.0, 32.0))
            .with_obstructive(false)
            .with_gravity(false);
        body.move_down(600.0);
        let outcome = TileCollider::step(&mut body, &map, DT, &config);
        assert_eq!(outcome, StepOutcome::default());
        assert!((body.y() - 160.0).abs() < 1e-3);
    }
}
