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
//! Simulation world
//!
//! The [`World`] bundles everything a system may touch during a frame: the
//! entity pool, the static tile map, this frame's input and the engine
//! configuration. Systems receive it by mutable reference from the
//! [`Scheduler`](crate::ecs::Scheduler).

use crate::config::EngineConfig;
use crate::ecs::{EntityPool, LifecycleEvent};
use crate::game::systems::DamageReport;
use crate::input::InputState;
use crate::physics::TileMap;

/// State shared by all systems of a frame
#[derive(Debug)]
pub struct World {
    /// Entities and their components
    pub entities: EntityPool,
    /// Static level geometry
    pub tiles: TileMap,
    /// Key state for the current frame
    pub input: InputState,
    /// Tuning constants
    pub config: EngineConfig,
    /// Contacts resolved by the most recent combat pass
    pub damage: DamageReport,
    events: Vec<LifecycleEvent>,
    frame: u64,
}

impl World {
    /// Create a world over `tiles`
    pub fn new(config: EngineConfig, tiles: TileMap) -> Self {
        World {
            entities: EntityPool::with_config(config.pool.clone()),
            tiles,
            input: InputState::new(),
            config,
            damage: DamageReport::default(),
            events: Vec::new(),
            frame: 0,
        }
    }

    /// Open map the size of the configured window
    pub fn open_map(config: &EngineConfig) -> TileMap {
        let columns = (config.window.width as f32 / config.tile_size).ceil() as usize;
        let rows = (config.window.height as f32 / config.tile_size).ceil() as usize;
        TileMap::new(columns, rows, config.tile_size)
    }

    /// Close the frame: sweep destroyed entities and advance the counter
    ///
    /// The pool's lifecycle events move into [`frame_events`](Self::frame_events),
    /// replacing those of the previous frame. Returns the number of entities
    /// swept.
    pub fn end_frame(&mut self) -> usize {
        let swept = self.entities.sweep();
        if swept > 0 {
            log::debug!("frame {}: swept {} entities", self.frame, swept);
        }
        self.events = self.entities.drain_events();
        self.frame += 1;
        swept
    }

    /// Lifecycle events of the last completed frame
    pub fn frame_events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    /// Number of completed frames
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for World {
    fn default() -> Self {
        let config = EngineConfig::default();
        let tiles = World::open_map(&config);
        World::new(config, tiles)
    }
}
