//! Tunable simulation constants.
//!
//! Two rule-sets exist: `classic` (the default) and `arcade`, which adds double
//! jump, a horizontal speed clamp, falling water and different environmental
//! tick rates. Either can be overridden field-by-field from TOML.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Named preset a config file can start from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Classic,
    Arcade,
}

impl Preset {
    pub fn rules(self) -> RuleSet {
        match self {
            Preset::Classic => RuleSet::classic(),
            Preset::Arcade => RuleSet::arcade(),
        }
    }
}

/// Every constant the step reads. Units are pixels and ticks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleSet {
    // -- movement --
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// Negative is upward.
    pub jump_force: f32,
    /// Replaces the bounce block's own multiplier when set.
    pub bounce_override: Option<f32>,
    /// Fraction of move speed added per tick of held input.
    pub move_accel: f32,
    pub ground_friction: f32,
    pub water_speed: f32,
    pub water_friction: f32,
    pub lava_speed: f32,
    pub lava_friction: f32,
    /// Clamp |vx| to the move speed and snap tiny drift to zero.
    pub clamp_speed: bool,
    pub double_jump: bool,

    // -- water --
    pub water_jump: f32,
    /// With air above the head, a swim jump uses `jump_force * factor` instead.
    pub surface_jump_factor: Option<f32>,
    pub water_gravity: f32,
    pub water_fall_cap: f32,
    pub breath_drain: f32,
    pub breath_regen: f32,
    pub drown_damage: f32,
    pub drown_interval: u64,
    /// Ticks between falling-water passes. Zero disables flow.
    pub water_flow_interval: u64,

    // -- hazards --
    pub lava_damage: f32,
    pub lava_interval: u64,
    pub spike_damage: f32,
    pub spike_launch: f32,
    pub crumble_delay: u32,
    /// Distance below the world's bottom edge that counts as falling out.
    pub death_margin: f32,

    // -- player --
    pub dash_cost: f32,
    pub dash_speed: f32,
    pub dash_cooldown: u32,
    pub dash_invulnerability: u32,
    pub stamina_regen: f32,
    pub hurt_invulnerability: u32,

    // -- interaction --
    pub interaction_range: f32,
    pub mine_cost: u32,
    pub build_cooldown: u32,
    pub weapon_cooldown: u32,
    pub place_cost: u32,
    pub water_cost: u32,
    pub lava_cost: u32,
    pub tnt_cost: u32,

    // -- mobs --
    pub aggro_range: f32,
    /// Horizontal distance inside which walkers stop steering.
    pub chase_deadzone: f32,
    pub idle_decay: f32,
    pub flyer_climb_speed: f32,
    pub mob_water_speed: f32,
    pub mob_water_gravity: f32,
    pub mob_water_fall_cap: f32,
    pub mob_lava_speed: f32,
    pub mob_lava_damage: f32,
    pub mob_lava_interval: u64,
    pub mob_hurt_ticks: u32,
    pub contact_interval: u64,
    pub contact_damage: f32,
    pub contact_damage_per_level: f32,
    pub boss_contact_damage: f32,
    pub boss_contact_damage_per_level: f32,
    pub contact_knockback_x: f32,
    pub contact_knockback_y: f32,
    pub boss_hop_chance: f64,
    pub melee_knockback_x: f32,
    pub melee_knockback_y: f32,

    // -- projectiles & explosions --
    pub projectile_speed: f32,
    pub projectile_gravity: f32,
    pub projectile_life: u32,
    pub projectile_damage: f32,
    pub projectile_blast_radius: f32,
    pub wand_cooldown: u32,
    pub crit_chance: f64,
    pub crit_multiplier: f32,
    pub tnt_fuse: u32,
    pub tnt_radius: f32,
    pub explosion_mob_damage: f32,
    pub explosion_player_damage: f32,
    /// Entities closer than `radius + reach_margin` tiles are affected.
    pub explosion_reach_margin: f32,
    /// Damage reaches zero at `radius + falloff_margin` tiles.
    pub explosion_falloff_margin: f32,
    pub explosion_push: f32,

    // -- economy --
    pub combo_window: u32,
    pub combo_factor: f32,
    pub level_bonus: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::classic()
    }
}

impl RuleSet {
    /// The default rule-set.
    pub fn classic() -> Self {
        Self {
            gravity: 0.5,
            terminal_velocity: 15.0,
            jump_force: -11.0,
            bounce_override: None,
            move_accel: 0.15,
            ground_friction: 0.8,
            water_speed: 0.6,
            water_friction: 0.85,
            lava_speed: 0.3,
            lava_friction: 0.6,
            clamp_speed: false,
            double_jump: false,

            water_jump: -3.0,
            surface_jump_factor: None,
            water_gravity: 0.2,
            water_fall_cap: 4.0,
            breath_drain: 0.4,
            breath_regen: 0.8,
            drown_damage: 5.0,
            drown_interval: 30,
            water_flow_interval: 0,

            lava_damage: 10.0,
            lava_interval: 20,
            spike_damage: 10.0,
            spike_launch: -10.0,
            crumble_delay: 25,
            death_margin: 200.0,

            dash_cost: 30.0,
            dash_speed: 20.0,
            dash_cooldown: 30,
            dash_invulnerability: 10,
            stamina_regen: 0.5,
            hurt_invulnerability: 30,

            interaction_range: 200.0,
            mine_cost: 1,
            build_cooldown: 8,
            weapon_cooldown: 12,
            place_cost: 1,
            water_cost: 5,
            lava_cost: 30,
            tnt_cost: 10,

            aggro_range: 700.0,
            chase_deadzone: 10.0,
            idle_decay: 0.9,
            flyer_climb_speed: 1.5,
            mob_water_speed: 0.5,
            mob_water_gravity: 0.1,
            mob_water_fall_cap: 2.0,
            mob_lava_speed: 0.1,
            mob_lava_damage: 10.0,
            mob_lava_interval: 30,
            mob_hurt_ticks: 10,
            contact_interval: 30,
            contact_damage: 10.0,
            contact_damage_per_level: 1.0,
            boss_contact_damage: 25.0,
            boss_contact_damage_per_level: 2.0,
            contact_knockback_x: 10.0,
            contact_knockback_y: -6.0,
            boss_hop_chance: 0.02,
            melee_knockback_x: 8.0,
            melee_knockback_y: -6.0,

            projectile_speed: 12.0,
            projectile_gravity: 0.2,
            projectile_life: 50,
            projectile_damage: 30.0,
            projectile_blast_radius: 1.5,
            wand_cooldown: 20,
            crit_chance: 0.2,
            crit_multiplier: 2.0,
            tnt_fuse: 100,
            tnt_radius: 4.0,
            explosion_mob_damage: 100.0,
            explosion_player_damage: 40.0,
            explosion_reach_margin: 1.0,
            explosion_falloff_margin: 2.0,
            explosion_push: 15.0,

            combo_window: 120,
            combo_factor: 1.5,
            level_bonus: 200,
        }
    }

    /// Faster acceleration with a speed clamp, double jump, falling water,
    /// gentler mob contact and slower lava ticks.
    pub fn arcade() -> Self {
        Self {
            bounce_override: Some(1.5),
            move_accel: 0.2,
            water_speed: 0.5,
            water_friction: 0.7,
            lava_speed: 0.1,
            lava_friction: 0.5,
            clamp_speed: true,
            double_jump: true,
            surface_jump_factor: Some(0.5),
            water_gravity: 0.1,
            water_fall_cap: 3.0,
            breath_drain: 0.5,
            breath_regen: 1.0,
            water_flow_interval: 5,
            lava_interval: 30,
            crumble_delay: 30,
            contact_interval: 20,
            contact_damage: 5.0,
            boss_contact_damage: 20.0,
            boss_contact_damage_per_level: 1.0,
            contact_knockback_y: -5.0,
            ..Self::classic()
        }
    }

    /// Parse a TOML table of overrides on top of the classic rule-set.
    pub fn from_toml(s: &str) -> Result<Self, GameError> {
        Ok(toml::from_str(s)?)
    }

    /// Apply a TOML table of overrides on top of `self`.
    pub fn with_overrides(&self, overrides: &toml::Table) -> Result<Self, GameError> {
        let mut merged = match toml::Value::try_from(self)? {
            toml::Value::Table(t) => t,
            _ => toml::Table::new(),
        };
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// Placement price for a block id.
    pub fn place_cost_of(&self, id: blockhiker_world::block_registry::BlockId) -> u32 {
        use blockhiker_world::block_registry::block_id;
        match id {
            block_id::WATER => self.water_cost,
            block_id::LAVA => self.lava_cost,
            block_id::TNT => self.tnt_cost,
            _ => self.place_cost,
        }
    }
}

/// Whether a periodic effect with the given interval fires on `tick`.
/// An interval of zero never fires.
pub fn periodic(tick: u64, interval: u64) -> bool {
    interval != 0 && tick % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockhiker_world::block_registry::block_id;

    #[test]
    fn default_is_classic() {
        assert_eq!(RuleSet::default(), RuleSet::classic());
        assert!(!RuleSet::classic().double_jump);
        assert_eq!(RuleSet::classic().water_flow_interval, 0);
    }

    #[test]
    fn arcade_differs_where_expected() {
        let a = RuleSet::arcade();
        assert!(a.double_jump);
        assert!(a.clamp_speed);
        assert_eq!(a.lava_interval, 30);
        assert_eq!(a.water_flow_interval, 5);
        assert_eq!(a.gravity, RuleSet::classic().gravity);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let rules = RuleSet::from_toml("gravity = 0.25\ndouble_jump = true\n").unwrap();
        assert_eq!(rules.gravity, 0.25);
        assert!(rules.double_jump);
        assert_eq!(rules.jump_force, -11.0);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = RuleSet::from_toml("gravity = \"heavy\"").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn overrides_apply_on_preset() {
        let mut table = toml::Table::new();
        table.insert("mine_cost".into(), toml::Value::Integer(3));
        let rules = Preset::Arcade.rules().with_overrides(&table).unwrap();
        assert_eq!(rules.mine_cost, 3);
        assert!(rules.double_jump);
        assert_eq!(rules.bounce_override, Some(1.5));
    }

    #[test]
    fn placement_prices() {
        let rules = RuleSet::classic();
        assert_eq!(rules.place_cost_of(block_id::DIRT), 1);
        assert_eq!(rules.place_cost_of(block_id::WATER), 5);
        assert_eq!(rules.place_cost_of(block_id::LAVA), 30);
        assert_eq!(rules.place_cost_of(block_id::TNT), 10);
    }

    #[test]
    fn periodic_ticks() {
        assert!(periodic(40, 20));
        assert!(!periodic(41, 20));
        assert!(!periodic(0, 0));
    }
}
