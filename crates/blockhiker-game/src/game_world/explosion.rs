//! Area explosions from TNT and wand bolts.

use std::sync::Arc;

use blockhiker_world::block_registry::block_id;
use blockhiker_world::TILE_SIZE;
use rand::Rng;
use tracing::debug;

use super::{GameEvent, GameWorld};
use crate::combat::falloff;
use crate::components::DamageSource;
use crate::effects::color;

impl GameWorld {
    /// Blow up a circle of tiles around `(cx, cy)` and damage nearby entities.
    ///
    /// A goal tile at the center cancels the explosion. Blast-proof blocks
    /// survive inside the radius. Mobs (and the player, when `affects_player`)
    /// closer than `radius + reach margin` tiles take damage that falls off
    /// linearly with distance and are pushed away from the center. Distances
    /// are measured to each entity's center, not its top-left corner.
    pub fn explode(&mut self, cx: i32, cy: i32, radius: f32, affects_player: bool) {
        if self.grid.info(cx, cy).goal {
            return;
        }
        let rules = Arc::clone(&self.rules);

        let reach = radius.ceil() as i32;
        let mut cleared = 0;
        for y in cy - reach..=cy + reach {
            for x in cx - reach..=cx + reach {
                let (dx, dy) = ((x - cx) as f32, (y - cy) as f32);
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let info = self.grid.info(x, y);
                if info.is_air() || info.blast_proof {
                    continue;
                }
                if self.grid.set(x, y, block_id::AIR) {
                    cleared += 1;
                    if self.rng.gen_bool(0.5) {
                        let px = (x as f32 + 0.5) * TILE_SIZE;
                        let py = (y as f32 + 0.5) * TILE_SIZE;
                        self.effects.burst(&mut self.rng, px, py, color::FIRE, 1);
                    }
                }
            }
        }
        debug!(x = cx, y = cy, radius, cleared, "Explosion");
        self.emit(GameEvent::Exploded {
            x: cx,
            y: cy,
            radius,
        });

        let origin = (cx as f32 + 0.5, cy as f32 + 0.5);
        let reach = radius + rules.explosion_reach_margin;

        let mut hurt = Vec::new();
        for (index, mob) in self.mobs.iter_mut().enumerate() {
            let (dist, dir) = blast_vector(mob.body.center(), origin);
            if dist >= reach {
                continue;
            }
            let f = falloff(dist, radius, rules.explosion_falloff_margin);
            let damage = rules.explosion_mob_damage * f;
            let hp = mob.take_damage(damage, rules.mob_hurt_ticks);
            mob.body.vx += dir.0 * rules.explosion_push * f;
            mob.body.vy += dir.1 * rules.explosion_push * f;
            hurt.push(GameEvent::MobHurt { index, damage, hp });
        }
        self.outgoing.events.extend(hurt);

        if affects_player {
            let (dist, dir) = blast_vector(self.player.center(), origin);
            if dist < reach {
                let f = falloff(dist, radius, rules.explosion_falloff_margin);
                self.hurt_player(
                    (rules.explosion_player_damage * f).floor(),
                    DamageSource::Explosion,
                );
                self.player.body.vx += dir.0 * rules.explosion_push * f;
                self.player.body.vy += dir.1 * rules.explosion_push * f;
            }
        }
    }
}

/// Distance in tiles from `origin` to a pixel position, and the unit vector
/// pointing away from `origin`. Straight up when they coincide.
fn blast_vector(center: (f32, f32), origin: (f32, f32)) -> (f32, (f32, f32)) {
    let dx = center.0 / TILE_SIZE - origin.0;
    let dy = center.1 / TILE_SIZE - origin.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= f32::EPSILON {
        (0.0, (0.0, -1.0))
    } else {
        (dist, (dx / dist, dy / dist))
    }
}
