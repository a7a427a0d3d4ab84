//! Gameplay layer on top of the ECS core
//!
//! Components, archetype spawners, the box overlap test, shared behaviors
//! and the per-frame systems that drive movement and combat.

pub mod behavior;
pub mod collision;
pub mod components;
pub mod spawn;
pub mod systems;

pub use collision::collides;
pub use systems::{
    add_gameplay_systems, resolve_damage, ControlSystem, DamageReport, DamageSystem, Hit, Knockback,
    LifetimeSystem, MovementSystem,
};
