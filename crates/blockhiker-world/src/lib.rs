//! Tile world: block registry, grid storage, collision, fluids, and terrain generation.

pub mod block_registry;
pub mod fluid;
pub mod grid;
pub mod physics;
pub mod terrain;

/// Edge length of one tile in world pixels.
pub const TILE_SIZE: f32 = 40.0;

/// Tile coordinate containing the world-space coordinate `v`.
pub fn tile_of(v: f32) -> i32 {
    (v / TILE_SIZE).floor() as i32
}
