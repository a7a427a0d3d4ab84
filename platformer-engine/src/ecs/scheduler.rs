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
//! Staged system scheduler
//!
//! Systems are grouped into stages that execute in ascending order. Within a
//! stage, systems run in the order they were added. The fixed order is what
//! guarantees that no system observes a component value produced later in
//! the same frame by a system that has not run yet.

use crate::ecs::System;
use crate::error::EcsResult;
use crate::world::World;

/// Stage identifier for grouping systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageId(pub usize);

impl StageId {
    /// Create a new stage ID
    pub fn new(id: usize) -> Self {
        StageId(id)
    }
}

/// Pre-defined stages of a gameplay frame
pub mod stages {
    use super::StageId;

    /// Input control: restore control, apply key state, fire bullets
    pub const INPUT: StageId = StageId(0);

    /// Gravity and velocity integration
    pub const MOVEMENT: StageId = StageId(1);

    /// Contact resolution: knockback and bullet damage
    pub const COMBAT: StageId = StageId(2);

    /// Expiry of short-lived entities
    pub const CLEANUP: StageId = StageId(3);
}

/// A system with metadata for scheduling
struct ScheduledSystem {
    system: Box<dyn System>,
    stage: StageId,
}

/// System scheduler with deterministic staged execution
///
/// # Examples
///
/// ```
/// use platformer_engine::ecs::scheduler::{Scheduler, stages};
/// use platformer_engine::ecs::System;
/// use platformer_engine::error::EcsResult;
/// use platformer_engine::world::World;
///
/// struct MySystem;
/// impl System for MySystem {
///     fn run(&mut self, _world: &mut World, _dt: f32) -> EcsResult<()> {
///         Ok(())
///     }
/// }
///
/// let mut scheduler = Scheduler::new();
/// scheduler.add_system(MySystem, stages::MOVEMENT);
/// ```
pub struct Scheduler {
    systems: Vec<ScheduledSystem>,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new() -> Self {
        Scheduler {
            systems: Vec::new(),
        }
    }

    /// Add a system to a specific stage
    ///
    /// Systems are kept sorted by stage; insertion order is preserved
    /// within a stage.
    pub fn add_system<S: System + 'static>(&mut self, system: S, stage: StageId) {
        let position = self.systems.partition_point(|s| s.stage <= stage);
        self.systems.insert(
            position,
            ScheduledSystem {
                system: Box::new(system),
                stage,
            },
        );
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Get the number of stages in use
    pub fn stage_count(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.stage.0)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    /// Names of the registered systems in execution order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system.name()).collect()
    }

    /// Execute all systems in stage order
    ///
    /// Stops at the first failing system and returns its error.
    pub fn run(&mut self, world: &mut World, dt: f32) -> EcsResult<()> {
        for scheduled in &mut self.systems {
            if let Err(err) = scheduled.system.run(world, dt) {
                log::error!("system {} failed: {}", scheduled.system.name(), err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Clear all systems from the scheduler
    pub fn clear(&mut self) {
        self.systems.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.system_names())
            .finish()
    }
}
