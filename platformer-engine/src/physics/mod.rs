//! Character physics against the tile map
//!
//! This module provides the physical body used by the hero and the tile
//! collision step that moves it through a static [`TileMap`].

mod body;
mod tiles;

pub use body::{ObstructFlags, PhysicalBody};
pub use tiles::{CollisionSide, StepOutcome, TileCollider, TileMap, TileType};
