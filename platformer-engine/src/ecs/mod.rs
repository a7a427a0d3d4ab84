//! Entity Component System (ECS) core implementation
//!
//! This module provides the foundational ECS architecture including:
//! - Generational entity handles
//! - Dense per-kind component storage
//! - The entity pool with enabled/attached signatures and deferred destruction
//! - Snapshot-based signature queries
//! - Staged system execution

mod entity;
mod component;
mod signature;
mod entity_pool;
pub mod query;
mod system;
pub mod scheduler;

pub use entity::{Entity, LifecycleEvent};
pub use component::{Component, ComponentStorage, DenseStorage};
pub use signature::{ComponentKind, Signature, MAX_COMPONENT_KINDS};
pub use entity_pool::EntityPool;
pub use query::{Query, QueryCursor, QueryFilter};
pub use system::System;
pub use scheduler::{Scheduler, StageId};
