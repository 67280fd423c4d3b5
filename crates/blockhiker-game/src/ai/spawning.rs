//! Level mob placement.

use blockhiker_world::block_registry::block_id;
use blockhiker_world::terrain::{Terrain, BOSS_ARENA};
use blockhiker_world::TILE_SIZE;
use rand::Rng;

use crate::mob_registry::{MobDefinition, MobRegistry};

/// Columns this far from either edge never roll a spawn.
const EDGE_CLEARANCE: i32 = 20;
/// Ground mobs spawn this many tiles above the surface.
const GROUND_DROP: i32 = 2;
/// Flyers spawn this many tiles above the surface.
const FLYER_ALTITUDE: i32 = 10;
/// Boss spawn height in pixels.
const BOSS_SPAWN_Y: f32 = 100.0;

/// A mob to create when the level loads. Position is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub def: &'static MobDefinition,
    pub x: f32,
    pub y: f32,
}

/// Chance that a column gets a mob.
pub fn spawn_chance(level: u32) -> f64 {
    (0.02 + 0.005 * level as f64).min(0.06)
}

/// Roll the mob list for a generated level, boss last.
pub fn plan_spawns(
    terrain: &Terrain,
    registry: &MobRegistry,
    rng: &mut impl Rng,
) -> Vec<SpawnPoint> {
    let level = terrain.level;
    let width = terrain.grid.width();
    let chance = spawn_chance(level);
    let available = registry.available(level);
    let mut spawns = Vec::new();

    if !available.is_empty() {
        for x in EDGE_CLEARANCE..width - EDGE_CLEARANCE {
            // Leave the boss arena to the boss.
            if terrain.boss_level && x > width - BOSS_ARENA - 10 {
                continue;
            }
            if !rng.gen_bool(chance) {
                continue;
            }
            let def = available[rng.gen_range(0..available.len())];
            let h = terrain.height_at(x);
            let px = x as f32 * TILE_SIZE;
            if def.kind.flies() {
                spawns.push(SpawnPoint {
                    def,
                    x: px,
                    y: (h - FLYER_ALTITUDE) as f32 * TILE_SIZE,
                });
            } else if terrain.grid.get(x, h) != block_id::AIR {
                spawns.push(SpawnPoint {
                    def,
                    x: px,
                    y: (h - GROUND_DROP) as f32 * TILE_SIZE,
                });
            }
        }
    }

    if terrain.boss_level {
        if let Some(def) = registry.boss_for(level) {
            spawns.push(SpawnPoint {
                def,
                x: (width - EDGE_CLEARANCE) as f32 * TILE_SIZE,
                y: BOSS_SPAWN_Y,
            });
        }
    }

    spawns
}
