//! Player step: input, environment, timers and collision.

use std::sync::Arc;

use blockhiker_world::block_registry::{block_id, Hazard};
use blockhiker_world::physics::{sample_below, sample_center, step_body};
use blockhiker_world::{tile_of, TILE_SIZE};
use tracing::trace;

use super::{GameEvent, GameWorld};
use crate::components::{DamageSource, Facing, MAX_BREATH};
use crate::config::periodic;
use crate::effects::{self, color};
use crate::input::InputState;

/// Clamped horizontal speeds below this snap to zero.
const DRIFT_SNAP: f32 = 0.1;

impl GameWorld {
    pub(super) fn step_player(&mut self, input: &InputState) {
        let rules = Arc::clone(&self.rules);
        let tick = self.tick;
        let mut pending: Vec<(f32, DamageSource)> = Vec::new();

        let center = sample_center(&self.player.body, &self.grid);
        let below = sample_below(&self.player.body, &self.grid);
        let submerged = center.info.fluid && center.info.hazard == Hazard::None;
        let in_lava = center.info.hazard == Hazard::Lava;

        let p = &mut self.player;
        p.submerged = submerged;
        p.in_lava = in_lava;

        // -- horizontal control --
        let (move_speed, friction) = if submerged {
            (p.speed * rules.water_speed, rules.water_friction)
        } else if in_lava {
            (p.speed * rules.lava_speed, rules.lava_friction)
        } else {
            (p.speed, below.info.friction.unwrap_or(rules.ground_friction))
        };
        match input.horizontal() {
            -1 => {
                p.body.vx -= move_speed * rules.move_accel;
                p.facing = Facing::Left;
            }
            1 => {
                p.body.vx += move_speed * rules.move_accel;
                p.facing = Facing::Right;
            }
            _ => p.body.vx *= friction,
        }

        // -- dash --
        let mut dashed = false;
        if input.dash && p.dash_timer == 0 && p.stamina > rules.dash_cost {
            p.body.vx = p.facing.sign() * rules.dash_speed;
            p.stamina -= rules.dash_cost;
            p.dash_timer = rules.dash_cooldown;
            p.invulnerable = p.invulnerable.max(rules.dash_invulnerability);
            dashed = true;
        }
        if rules.clamp_speed && p.dash_timer == 0 {
            p.body.vx = p.body.vx.clamp(-move_speed, move_speed);
            if p.body.vx.abs() < DRIFT_SNAP {
                p.body.vx = 0.0;
            }
        }
        p.dash_timer = p.dash_timer.saturating_sub(1);
        p.stamina = (p.stamina + rules.stamina_regen).min(p.max_stamina);

        // -- jump --
        let mut jumped = false;
        if input.jump || input.jump_pressed {
            if submerged {
                let head_x = tile_of(p.body.x + p.body.width / 2.0);
                let above_head = tile_of(p.body.y) - 1;
                p.body.vy = match rules.surface_jump_factor {
                    Some(factor) if self.grid.get(head_x, above_head) == block_id::AIR => {
                        rules.jump_force * factor
                    }
                    _ => rules.water_jump,
                };
            } else if p.body.grounded {
                let mult = below
                    .info
                    .bounce
                    .map(|b| rules.bounce_override.unwrap_or(b))
                    .unwrap_or(1.0);
                p.body.vy = rules.jump_force * mult;
                p.body.grounded = false;
                p.jumps = 1;
                jumped = true;
            } else if rules.double_jump && input.jump_pressed && p.jumps < 2 {
                p.body.vy = rules.jump_force;
                p.jumps = 2;
                jumped = true;
            }
        }

        // -- crumbling planks --
        if below.info.crumbles && p.body.grounded {
            effects::arm_once(&mut self.crumbles, below.x, below.y, rules.crumble_delay);
        }

        // -- gravity and environment --
        let p = &mut self.player;
        if submerged {
            p.body.vy = (p.body.vy + rules.water_gravity).min(rules.water_fall_cap);
            p.breath = (p.breath - rules.breath_drain).max(0.0);
            if p.breath <= 0.0 && periodic(tick, rules.drown_interval) {
                pending.push((rules.drown_damage, DamageSource::Drowning));
            }
        } else {
            p.body.vy += rules.gravity;
            p.breath = (p.breath + rules.breath_regen).min(MAX_BREATH);
        }
        if in_lava && periodic(tick, rules.lava_interval) {
            pending.push((rules.lava_damage, DamageSource::Lava));
        }
        p.body.vy = p.body.vy.min(rules.terminal_velocity);
        p.attack_timer = p.attack_timer.saturating_sub(1);
        p.action_timer = p.action_timer.saturating_sub(1);

        // -- integrate --
        let (h, v) = step_body(&mut p.body, &self.grid, Some(rules.spike_launch));
        if h.hazard || v.hazard {
            pending.push((rules.spike_damage, DamageSource::Spike));
        }
        if p.body.grounded {
            p.jumps = 0;
        }

        if dashed {
            let (x, y) = p.center();
            self.effects.burst(&mut self.rng, x, y, color::DASH, 10);
            self.emit(GameEvent::Dashed);
        }
        if jumped {
            self.emit(GameEvent::Jumped);
        }
        for (amount, source) in pending {
            if self.hurt_player(amount, source) {
                trace!(amount, ?source, hp = self.player.hp, "Environmental damage");
            }
        }

        self.step_crumbles();
    }

    fn step_crumbles(&mut self) {
        for (x, y) in effects::tick_countdowns(&mut self.crumbles) {
            // The plank may have been mined or replaced while the timer ran.
            if !self.grid.info(x, y).crumbles {
                continue;
            }
            self.grid.set(x, y, block_id::AIR);
            let (px, py) = ((x as f32 + 0.5) * TILE_SIZE, (y as f32 + 0.5) * TILE_SIZE);
            self.effects.burst(&mut self.rng, px, py, color::PLANK, 5);
            self.emit(GameEvent::Crumbled { x, y });
        }
    }
}
