//! Level terrain generator.
//!
//! Produces the grid for one level: a sine heightmap with a flat spawn strip,
//! layered soil over ore-bearing stone, a brick floor, water ponds and the goal
//! tile. Boss levels get a flat arena at the far end. Mob placement happens in
//! the game crate, which reads the heightmap returned here.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::block_registry::{block_id, BlockId, BlockRegistry};
use crate::grid::Grid;
use crate::TILE_SIZE;

/// Every level is this many rows tall.
pub const LEVEL_HEIGHT: i32 = 60;

/// Columns left of this are flattened for the spawn area.
pub const SPAWN_STRIP: i32 = 15;

/// Width of the flattened arena on boss levels.
pub const BOSS_ARENA: i32 = 50;

/// Distance of the goal tile from the right edge.
pub const GOAL_INSET: i32 = 5;

/// Highest level the generator will build. Larger requests build this one.
pub const MAX_LEVEL: u32 = 999;

/// Rows of brick at the bottom of the world.
const FLOOR_ROWS: i32 = 2;

/// Rows of dirt under the grass layer.
const DIRT_DEPTH: i32 = 4;

const MIN_SURFACE: i32 = 15;

/// Column the player spawns above.
const SPAWN_COLUMN: i32 = 5;

/// Ore chances per stone cell, checked rarest first.
const DIAMOND_CHANCE: f64 = 0.01;
const GOLD_CHANCE: f64 = 0.02;
const COAL_CHANCE: f64 = 0.04;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A freshly generated level.
#[derive(Debug, Clone)]
pub struct Terrain {
    pub level: u32,
    pub grid: Grid,
    /// Surface row (grass) per column, after spawn/arena flattening.
    pub heights: Vec<i32>,
    /// Tile position of the goal block.
    pub goal: (i32, i32),
    /// Player start, top-left corner in world pixels.
    pub spawn: (f32, f32),
    pub boss_level: bool,
}

impl Terrain {
    /// Surface row of column `x`, clamped to the grid.
    pub fn height_at(&self, x: i32) -> i32 {
        let i = x.clamp(0, self.heights.len().saturating_sub(1) as i32) as usize;
        self.heights.get(i).copied().unwrap_or(LEVEL_HEIGHT / 2)
    }
}

/// Grid width of level `level`.
pub fn level_width(level: u32) -> i32 {
    150 + 10 * level.min(MAX_LEVEL) as i32
}

/// Every third level hosts a boss.
pub fn is_boss_level(level: u32) -> bool {
    level % 3 == 0
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate level `level` using `rng` for ores and ponds.
pub fn generate(level: u32, registry: Arc<BlockRegistry>, rng: &mut impl Rng) -> Terrain {
    let width = level_width(level);
    let boss_level = is_boss_level(level);
    let heights = heightmap(level, width, boss_level);

    let mut grid = Grid::new(width, LEVEL_HEIGHT, registry);
    fill_columns(&mut grid, &heights, rng);

    let goal_x = width - GOAL_INSET;
    let goal = (goal_x, heights[goal_x as usize] - 1);
    grid.set(goal.0, goal.1, block_id::GOAL);

    let ponds = dig_ponds(&mut grid, &heights, rng);

    let spawn = (
        SPAWN_COLUMN as f32 * TILE_SIZE,
        (heights[SPAWN_COLUMN as usize] - 3) as f32 * TILE_SIZE,
    );

    debug!(level, width, boss_level, ponds, "Generated terrain");

    Terrain {
        level,
        grid,
        heights,
        goal,
        spawn,
        boss_level,
    }
}

/// Surface row per column: two sine octaves whose amplitude grows with level.
fn heightmap(level: u32, width: i32, boss_level: bool) -> Vec<i32> {
    let flat = LEVEL_HEIGHT / 2;
    let lvl = level as f32;
    (0..width)
        .map(|x| {
            if x < SPAWN_STRIP || (boss_level && x > width - BOSS_ARENA) {
                return flat;
            }
            let xf = x as f32;
            let base = (xf * 0.05).sin() * (5.0 + lvl * 2.0);
            let detail = (xf * 0.3).sin() * (2.0 + lvl);
            let h = (LEVEL_HEIGHT as f32 / 2.0 + base + detail).floor() as i32;
            h.clamp(MIN_SURFACE, LEVEL_HEIGHT - 5)
        })
        .collect()
}

fn fill_columns(grid: &mut Grid, heights: &[i32], rng: &mut impl Rng) {
    for (x, &h) in heights.iter().enumerate() {
        let x = x as i32;
        for y in h..LEVEL_HEIGHT {
            let block = if y >= LEVEL_HEIGHT - FLOOR_ROWS {
                block_id::BRICK
            } else if y == h {
                block_id::GRASS
            } else if y <= h + DIRT_DEPTH {
                block_id::DIRT
            } else {
                roll_stone(rng)
            };
            grid.set(x, y, block);
        }
    }
}

fn roll_stone(rng: &mut impl Rng) -> BlockId {
    let r: f64 = rng.gen();
    if r < DIAMOND_CHANCE {
        block_id::DIAMOND_ORE
    } else if r < GOLD_CHANCE {
        block_id::GOLD_ORE
    } else if r < COAL_CHANCE {
        block_id::COAL_ORE
    } else {
        block_id::STONE
    }
}

/// Flood 1-5 rectangular ponds into the ground. Returns the pond count.
fn dig_ponds(grid: &mut Grid, heights: &[i32], rng: &mut impl Rng) -> usize {
    let width = grid.width();
    if width <= 40 {
        return 0;
    }
    let count = rng.gen_range(1..=5);
    for _ in 0..count {
        let cx = rng.gen_range(20..width - 20);
        let cy = heights[cx as usize];
        let r = rng.gen_range(3..=6);
        for py in cy..cy + r {
            if py >= LEVEL_HEIGHT - FLOOR_ROWS {
                break;
            }
            for px in (cx - r).max(1)..(cx + r).min(width) {
                let current = grid.get(px, py);
                if current != block_id::AIR && current != block_id::GOAL {
                    grid.set(px, py, block_id::WATER);
                }
            }
        }
    }
    count
}
