//! Mob AI: per-archetype steering and level spawn placement.

pub mod behaviors;
pub mod spawning;
