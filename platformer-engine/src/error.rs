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
//! Error types
//!
//! Errors are split by the layer that produces them:
//!
//! - [`EcsError`]: query/programmer errors from the entity pool, such as asking
//!   for a component an entity does not carry. These are never silently
//!   defaulted.
//! - [`RenderError`]: device and draw-call sequencing failures. Callers are
//!   expected to skip the frame and retry on the next one.
//! - [`ConfigError`]: invalid or unparsable engine configuration.

use crate::ecs::Entity;
use thiserror::Error;

/// Errors raised by the entity pool and component storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The entity does not carry the requested component
    #[error("{entity} has no component `{component}`")]
    NotFound {
        /// Entity that was queried
        entity: Entity,
        /// Type name of the missing component
        component: &'static str,
    },

    /// The entity handle is stale or was never allocated
    #[error("{0} is not alive")]
    DeadEntity(Entity),

    /// More component kinds were registered than a signature can hold
    #[error("component kind limit of {limit} reached")]
    ComponentKindLimit {
        /// Maximum number of distinct component kinds
        limit: usize,
    },
}

/// Errors raised by the render context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// `begin_draw` was called while a frame was already open
    #[error("begin_draw called twice without end_draw")]
    AlreadyDrawing,

    /// `end_draw` (or a draw call) was issued outside an open frame
    #[error("no frame is open")]
    NotDrawing,

    /// The device was lost; resources are recreated on the next frame
    #[error("render device lost")]
    DeviceLost,

    /// Device-dependent resources could not be created
    #[error("failed to create device resources: {0}")]
    ResourceCreation(String),
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its valid range
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// The configuration document could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for entity pool operations
pub type EcsResult<T> = Result<T, EcsError>;

/// Result alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;
