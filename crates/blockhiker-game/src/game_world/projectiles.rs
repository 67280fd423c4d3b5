//! Wand projectiles: flight, impact and the small blast they leave.

use std::sync::Arc;

use blockhiker_world::tile_of;

use super::{GameEvent, GameWorld};
use crate::combat::{projectile_damage, roll_critical};
use crate::effects::color;
use crate::projectile::stops_projectile;

impl GameWorld {
    pub(super) fn step_projectiles(&mut self) {
        let rules = Arc::clone(&self.rules);
        let mut i = self.projectiles.len();
        while i > 0 {
            i -= 1;
            let mut shot = self.projectiles[i];
            shot.step(rules.projectile_gravity);
            self.projectiles[i] = shot;
            let (tx, ty) = (tile_of(shot.x), tile_of(shot.y));

            if stops_projectile(self.grid.info(tx, ty)) || shot.expired() {
                self.projectiles.remove(i);
                self.explode(tx, ty, rules.projectile_blast_radius, false);
                continue;
            }

            let Some(target) = self.mobs.iter().position(|m| shot.hits(&m.aabb())) else {
                continue;
            };
            self.projectiles.remove(i);
            let critical = roll_critical(&mut self.rng, rules.crit_chance);
            let damage = projectile_damage(&rules, self.player.damage, critical);
            let hp = self.mobs[target].take_damage(damage, rules.mob_hurt_ticks);
            let (text, tint) = if critical {
                (format!("CRIT {damage}!"), color::RED)
            } else {
                (format!("{damage}"), color::WHITE)
            };
            self.effects.text(shot.x, shot.y, text, tint);
            self.emit(GameEvent::MobHurt {
                index: target,
                damage,
                hp,
            });
            self.explode(tx, ty, rules.projectile_blast_radius, false);
        }
    }
}
