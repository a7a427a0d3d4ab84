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
//! # Platformer Engine
//!
//! An ECS (Entity Component System) based simulation core for a 2D
//! side-scrolling platformer.
//!
//! ## Features
//!
//! - **ECS Architecture**: generational entities, signature queries,
//!   per-component enable/disable and deferred destruction
//! - **Combat**: box overlap, knockback on body contact, bullet damage
//! - **Hero**: an explicit state machine over a tile-colliding body
//! - **Scenes**: a state stack and a render context that survives device loss
//! - **Parallelization**: optional Rayon integration for large movement batches
//!
//! ## Example
//!
//! ```rust
//! use platformer_engine::ecs::EntityPool;
//! use platformer_engine::game::components::{Health, Monster, Position};
//!
//! let mut pool = EntityPool::new();
//! let monster = pool.create();
//! pool.set(monster, Position::new(64.0, 96.0)).unwrap();
//! pool.set(monster, Health::new(10, 32.0, 32.0)).unwrap();
//! pool.set(monster, Monster).unwrap();
//!
//! let mut cursor = pool.query::<(Position, Monster)>();
//! assert_eq!(cursor.next(&pool), Some(monster));
//!
//! pool.destroy(monster);
//! assert!(pool.is_pending_destroy(monster));
//! assert!(pool.get::<Health>(monster).is_ok());
//! assert_eq!(pool.sweep(), 1);
//! assert!(!pool.is_alive(monster));
//! ```

#![warn(missing_docs)]

/// Application shell and scene stack
pub mod app;

/// Engine configuration
pub mod config;

/// Entity Component System implementation
pub mod ecs;

/// Error types
pub mod error;

/// Gameplay components and systems
pub mod game;

/// The player character and its state machine
pub mod hero;

/// Keyboard state
pub mod input;

/// Tile collision for physical bodies
pub mod physics;

/// Memory pooling for reducing allocation churn
pub mod pool;

/// Drawing abstraction and device lifecycle
pub mod render;

/// Per-frame simulation state
pub mod world;

pub use app::{App, GamePlayState, GameState, StateStack, Transition};
pub use config::EngineConfig;
pub use ecs::{Entity, EntityPool};
pub use error::{ConfigError, EcsError, RenderError};
pub use hero::{Hero, HeroState};
pub use world::World;
