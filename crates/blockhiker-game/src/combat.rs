//! Combat calculations: weapon profiles, melee hitboxes, critical hits,
//! explosion falloff, contact damage and kill payouts.

use blockhiker_world::physics::{Aabb, Body};
use rand::Rng;

use crate::components::Facing;
use crate::config::RuleSet;
use crate::inventory::Tool;
use crate::mob_registry::MobKind;

// ---------------------------------------------------------------------------
// Weapons
// ---------------------------------------------------------------------------

/// Melee characteristics of a tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    /// Hitbox width in pixels.
    pub reach: f32,
    pub damage_mult: f32,
    /// Ticks before the next attack.
    pub cooldown: u32,
}

/// Melee profile for a tool, or `None` for the ranged wand.
pub fn weapon_profile(tool: Tool) -> Option<WeaponProfile> {
    match tool {
        Tool::Sword => Some(WeaponProfile {
            reach: 80.0,
            damage_mult: 1.0,
            cooldown: 15,
        }),
        Tool::Axe => Some(WeaponProfile {
            reach: 90.0,
            damage_mult: 1.5,
            cooldown: 25,
        }),
        Tool::Spear => Some(WeaponProfile {
            reach: 140.0,
            damage_mult: 0.8,
            cooldown: 15,
        }),
        Tool::Wand => None,
    }
}

/// Slash area in front of the attacker.
///
/// The box extends `reach` pixels from 10 px behind the attacker's center in
/// the facing direction, and 10 px above and below the body.
pub fn melee_hitbox(attacker: &Body, facing: Facing, reach: f32) -> Aabb {
    let center_x = attacker.x + attacker.width / 2.0;
    let x = match facing {
        Facing::Right => center_x - 10.0,
        Facing::Left => center_x - reach + 10.0,
    };
    Aabb::new(x, attacker.y - 10.0, reach, attacker.height + 20.0)
}

// ---------------------------------------------------------------------------
// Critical hits
// ---------------------------------------------------------------------------

/// Roll for a critical hit.
pub fn roll_critical(rng: &mut impl Rng, chance: f64) -> bool {
    chance > 0.0 && rng.gen_bool(chance.min(1.0))
}

/// Wand projectile damage: base plus the player's damage stat, doubled on a crit.
pub fn projectile_damage(rules: &RuleSet, player_damage: f32, critical: bool) -> f32 {
    let base = rules.projectile_damage + player_damage;
    if critical {
        base * rules.crit_multiplier
    } else {
        base
    }
}

// ---------------------------------------------------------------------------
// Area damage
// ---------------------------------------------------------------------------

/// Linear damage factor: 1 at the center, 0 at `radius + margin` and beyond.
pub fn falloff(distance: f32, radius: f32, margin: f32) -> f32 {
    let edge = radius + margin;
    if edge <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / edge).max(0.0)
}

// ---------------------------------------------------------------------------
// Mob contact
// ---------------------------------------------------------------------------

/// Damage a mob deals to the player on contact at `level`.
pub fn contact_damage(kind: MobKind, level: u32, rules: &RuleSet) -> f32 {
    let level = level as f32;
    match kind {
        MobKind::Boss => rules.boss_contact_damage + rules.boss_contact_damage_per_level * level,
        _ => rules.contact_damage + rules.contact_damage_per_level * level,
    }
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// Gold paid for a kill: the mob's reward plus `floor(combo * factor)`.
/// `combo` already counts this kill.
pub fn kill_payout(reward: u32, combo: u32, factor: f32) -> u32 {
    reward + (combo as f32 * factor).floor() as u32
}
