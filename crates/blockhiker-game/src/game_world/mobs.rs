//! Mob step: environment, steering, contact damage, physics and despawn.

use std::sync::Arc;

use blockhiker_world::block_registry::Hazard;
use blockhiker_world::physics::{sample_center, step_body};
use blockhiker_world::TILE_SIZE;
use tracing::{debug, info, trace};

use super::{GameEvent, GameWorld};
use crate::ai::behaviors::{self, SteerContext, Steering};
use crate::combat::{contact_damage, kill_payout};
use crate::components::DamageSource;
use crate::config::{periodic, RuleSet};
use crate::effects::color;

/// Knockback applied to the player by a contact hit.
struct ContactHit {
    damage: f32,
    push_x: f32,
}

impl GameWorld {
    pub(super) fn step_mobs(&mut self) {
        let rules = Arc::clone(&self.rules);
        let fall_limit = self.grid.height() as f32 * TILE_SIZE + rules.death_margin;

        // Back to front so removals keep earlier indices valid.
        let mut i = self.mobs.len();
        while i > 0 {
            i -= 1;
            if let Some(hit) = self.step_mob(i, &rules) {
                if self.hurt_player(hit.damage, DamageSource::Mob) {
                    trace!(damage = hit.damage, mob = self.mobs[i].name, "Contact hit");
                }
                self.player.body.vx = hit.push_x;
                self.player.body.vy = rules.contact_knockback_y;
            }

            let (fell, dead) = {
                let mob = &self.mobs[i];
                (mob.body.y > fall_limit, mob.is_dead())
            };
            if fell {
                let mob = self.mobs.remove(i);
                debug!(mob = mob.name, "Mob fell out of the world");
            } else if dead {
                self.kill_mob(i);
            }
        }
    }

    fn step_mob(&mut self, i: usize, rules: &RuleSet) -> Option<ContactHit> {
        let tick = self.tick;
        let level = self.level;
        let mob = &mut self.mobs[i];

        let cell = sample_center(&mob.body, &self.grid);
        let in_water = cell.info.fluid && cell.info.hazard == Hazard::None;
        let speed_mult = if in_water {
            mob.body.vy = mob.body.vy.min(rules.mob_water_fall_cap);
            rules.mob_water_speed
        } else if cell.info.hazard == Hazard::Lava {
            if periodic(tick, rules.mob_lava_interval) {
                mob.take_damage(rules.mob_lava_damage, rules.mob_hurt_ticks);
            }
            rules.mob_lava_speed
        } else {
            1.0
        };

        let ctx = SteerContext {
            target: &self.player.body,
            grid: &self.grid,
            rules,
            speed_mult,
        };
        let steering = behaviors::steer(mob, &ctx, &mut self.rng);

        let mut contact = None;
        if steering != Steering::Idle
            && mob.aabb().overlaps(&self.player.aabb())
            && mob.contact_ready(tick, rules.contact_interval)
        {
            mob.last_contact = Some(tick);
            let push = if self.player.body.x < mob.body.x {
                -rules.contact_knockback_x
            } else {
                rules.contact_knockback_x
            };
            contact = Some(ContactHit {
                damage: contact_damage(mob.kind, level, rules),
                push_x: push,
            });
        }

        if !mob.kind.flies() {
            let gravity = if in_water {
                rules.mob_water_gravity
            } else {
                rules.gravity
            };
            mob.body.vy = (mob.body.vy + gravity).min(rules.terminal_velocity);
        }
        step_body(&mut mob.body, &self.grid, None);
        mob.hurt_timer = mob.hurt_timer.saturating_sub(1);

        contact
    }

    /// Remove a dead mob and pay out its reward with the combo bonus.
    fn kill_mob(&mut self, i: usize) {
        let mob = self.mobs.remove(i);
        self.combo += 1;
        self.combo_timer = self.rules.combo_window;
        let reward = kill_payout(mob.reward, self.combo, self.rules.combo_factor);
        self.player.gold += reward;

        let (x, y) = mob.body.center();
        self.effects.burst(&mut self.rng, x, y, color::RED, 10);
        self.effects.text(x, y - 20.0, format!("+{reward}G"), color::GOLD);
        if self.combo > 1 {
            self.effects
                .text(x, y - 40.0, format!("{}x COMBO!", self.combo), color::GOLD);
        }
        debug!(mob = mob.name, reward, combo = self.combo, "Mob killed");
        self.emit(GameEvent::MobKilled {
            name: mob.name,
            reward,
            combo: self.combo,
        });

        if mob.is_boss() {
            self.effects.burst(&mut self.rng, x, y, color::BOSS, 50);
            self.toast(format!("{} DEFEATED!", mob.name), false);
            info!(boss = mob.name, "Boss defeated");
            self.emit(GameEvent::BossDefeated { name: mob.name });
        }
    }
}

#[cfg(test)]
mod tests {
    use blockhiker_world::block_registry::block_id;

    use super::super::testing::{idle, room};
    use super::*;
    use crate::input::InputState;

    #[test]
    fn mob_killed_by_two_hits_pays_once() {
        let mut world = room(RuleSet::classic());
        world.player.damage = 20.0;
        world.spawn_mob("slime", 140.0, 380.0).unwrap();

        world.use_primary((0.0, 0.0)).unwrap();
        assert_eq!(world.mobs[0].hp, 10.0);
        world.player.attack_timer = 0;
        world.player.action_timer = 0;
        world.use_primary((0.0, 0.0)).unwrap();
        assert!(world.mobs[0].is_dead());

        world.tick(&InputState::idle());
        assert!(world.mobs.is_empty());
        // Reward 10 plus floor(1 * 1.5).
        assert_eq!(world.player.gold, 11);
        assert_eq!(world.combo(), 1);

        idle(&mut world, 5);
        assert_eq!(world.player.gold, 11);
        let kills = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MobKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn combo_grows_payout() {
        let mut world = room(RuleSet::classic());
        for x in [400.0, 500.0] {
            let i = world.spawn_mob("rat", x, 385.0).unwrap();
            world.mobs[i].hp = 0.0;
        }
        world.tick(&InputState::idle());
        // Back to front: 5 + 1, then 5 + 3.
        assert_eq!(world.player.gold, 14);
        assert_eq!(world.combo(), 2);
    }

    #[test]
    fn contact_damage_is_rate_limited() {
        let mut world = room(RuleSet::classic());
        world.spawn_mob("zombie", 90.0, 360.0).unwrap();
        world.tick(&InputState::idle());
        // 10 + 1 per level.
        assert_eq!(world.player.hp, 89.0);
        assert_eq!(world.player.body.vy, -6.0);

        world.player.invulnerable = 0;
        world.mobs[0].body.x = world.player.body.x;
        world.tick(&InputState::idle());
        assert_eq!(world.player.hp, 89.0);
    }

    #[test]
    fn boss_contact_hits_harder() {
        let mut world = room(RuleSet::classic());
        world.spawn_mob("boss_slime", 60.0, 310.0).unwrap();
        world.tick(&InputState::idle());
        assert_eq!(world.player.hp, 100.0 - 27.0);
    }

    #[test]
    fn boss_kill_is_announced() {
        let mut world = room(RuleSet::classic());
        let i = world.spawn_mob("boss_slime", 600.0, 310.0).unwrap();
        world.mobs[i].hp = 0.0;
        world.tick(&InputState::idle());
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::BossDefeated { name: "KING SLIME" }));
        assert_eq!(world.player.gold, 501);
        assert!(world.boss_bar().is_none());
    }

    #[test]
    fn fallen_mobs_despawn_without_reward() {
        let mut world = room(RuleSet::classic());
        world.spawn_mob("zombie", 400.0, 12.0 * TILE_SIZE + 300.0).unwrap();
        world.tick(&InputState::idle());
        assert!(world.mobs.is_empty());
        assert_eq!(world.player.gold, 0);
    }

    #[test]
    fn mobs_land_on_the_floor() {
        let mut world = room(RuleSet::classic());
        world.spawn_mob("zombie", 500.0, 200.0).unwrap();
        idle(&mut world, 60);
        let mob = &world.mobs[0];
        assert!(mob.body.grounded);
        assert_eq!(mob.body.y + mob.body.height, 10.0 * TILE_SIZE);
        for (tx, ty) in mob.aabb().intersecting_tiles() {
            assert!(!world.grid.info(tx, ty).blocks_movement());
        }
    }

    #[test]
    fn lava_burns_mobs() {
        let mut world = room(RuleSet::classic());
        world.grid.fill_rect(12, 8, 14, 9, block_id::LAVA);
        let i = world.spawn_mob("rat", 12.0 * TILE_SIZE + 5.0, 385.0).unwrap();
        idle(&mut world, 30);
        assert_eq!(world.mobs[i].hp, 5.0);
    }
}
