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
//! System execution framework
//!
//! Systems contain the per-frame logic that operates on entities and
//! components. They query the world's entity pool by signature and mutate
//! components in place.

use crate::error::EcsResult;
use crate::world::World;

/// Trait for systems that operate on the world once per frame
///
/// Systems should be stateless passes over component data. A query error
/// inside a system means a component the query guaranteed was missing,
/// which is a programming error; it is returned rather than defaulted.
pub trait System: Send + Sync {
    /// Execute the system for one frame of `dt` seconds
    fn run(&mut self, world: &mut World, dt: f32) -> EcsResult<()>;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
