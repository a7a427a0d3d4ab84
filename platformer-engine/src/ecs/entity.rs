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
//! Entity handles
//!
//! An entity is only an index into the pool's slot table plus a generation
//! counter. It owns no data; components live in the pool's storages.

use std::fmt;

/// Entity handle with generational index support for safe references
///
/// Indices are recycled after a sweep. The generation is bumped on every
/// recycle, so a handle kept past its entity's destruction never aliases the
/// entity that later reuses its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create a new entity with the given slot index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        Entity { index, generation }
    }

    /// Get the slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, gen: {})", self.index, self.generation)
    }
}

/// Lifecycle notification emitted by the entity pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The entity was created
    Spawned(Entity),
    /// The entity was swept; its storage is freed and its index recycled
    Destroyed(Entity),
}

impl LifecycleEvent {
    /// The entity this event refers to
    pub fn entity(&self) -> Entity {
        match *self {
            LifecycleEvent::Spawned(e) | LifecycleEvent::Destroyed(e) => e,
        }
    }
}
