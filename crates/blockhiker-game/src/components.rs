//! Entity records: the player and mobs.

use blockhiker_world::physics::{Aabb, Body};

use crate::inventory::Inventory;
use crate::mob_registry::{MobDefinition, MobKind};

pub const PLAYER_WIDTH: f32 = 28.0;
pub const PLAYER_HEIGHT: f32 = 38.0;

pub const BASE_HP: f32 = 100.0;
pub const BASE_STAMINA: f32 = 100.0;
pub const MAX_BREATH: f32 = 100.0;
pub const BASE_SPEED: f32 = 6.0;
pub const BASE_DAMAGE: f32 = 15.0;

/// Which way the player last moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `1.0` for right, `-1.0` for left.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// What dealt damage to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Mob,
    Spike,
    Lava,
    Drowning,
    Explosion,
}

impl DamageSource {
    /// Periodic environmental damage ignores the invulnerability window.
    pub fn bypasses_invulnerability(self) -> bool {
        matches!(self, DamageSource::Lava | DamageSource::Drowning)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The player character: body, vitals, upgrades and timers.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub hp: f32,
    pub max_hp: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub breath: f32,
    pub gold: u32,
    pub speed: f32,
    pub damage: f32,
    /// Blocks weapon use while non-zero.
    pub attack_timer: u32,
    /// Blocks every interaction while non-zero.
    pub action_timer: u32,
    pub dash_timer: u32,
    pub invulnerable: u32,
    /// Jumps used since last grounded.
    pub jumps: u8,
    pub submerged: bool,
    pub in_lava: bool,
    pub inventory: Inventory,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: Facing::Right,
            hp: BASE_HP,
            max_hp: BASE_HP,
            stamina: BASE_STAMINA,
            max_stamina: BASE_STAMINA,
            breath: MAX_BREATH,
            gold: 0,
            speed: BASE_SPEED,
            damage: BASE_DAMAGE,
            attack_timer: 0,
            action_timer: 0,
            dash_timer: 0,
            invulnerable: 0,
            jumps: 0,
            submerged: false,
            in_lava: false,
            inventory: Inventory::default(),
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    pub fn center(&self) -> (f32, f32) {
        self.body.center()
    }

    /// Apply damage unless the invulnerability window blocks it.
    ///
    /// Any applied hit (re)opens the window for `window` ticks. Returns whether
    /// damage was dealt.
    pub fn hurt(&mut self, amount: f32, source: DamageSource, window: u32) -> bool {
        if self.invulnerable > 0 && !source.bypasses_invulnerability() {
            return false;
        }
        self.hp -= amount;
        self.invulnerable = window;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Place the player at a spawn point, stopped, with fresh breath and stamina.
    pub fn respawn_at(&mut self, (x, y): (f32, f32)) {
        self.body = Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT);
        self.breath = MAX_BREATH;
        self.stamina = self.max_stamina;
        self.submerged = false;
        self.in_lava = false;
        self.jumps = 0;
        self.dash_timer = 0;
        self.attack_timer = 0;
        self.action_timer = 0;
        self.invulnerable = 0;
    }
}

// ---------------------------------------------------------------------------
// Mob
// ---------------------------------------------------------------------------

/// A live mob.
#[derive(Debug, Clone)]
pub struct Mob {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: MobKind,
    pub body: Body,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub jump: f32,
    pub reward: u32,
    /// Ticks of hurt flash remaining.
    pub hurt_timer: u32,
    /// Tick of the last contact hit on the player.
    pub last_contact: Option<u64>,
}

impl Mob {
    pub fn from_definition(def: &'static MobDefinition, x: f32, y: f32) -> Self {
        Self {
            key: def.key,
            name: def.display_name,
            kind: def.kind,
            body: Body::new(x, y, def.width, def.height),
            hp: def.max_hp,
            max_hp: def.max_hp,
            speed: def.speed,
            jump: def.jump,
            reward: def.reward,
            hurt_timer: 0,
            last_contact: None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    pub fn is_boss(&self) -> bool {
        self.kind == MobKind::Boss
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Subtract hp and start the hurt flash. Returns the remaining hp.
    pub fn take_damage(&mut self, amount: f32, flash: u32) -> f32 {
        self.hp -= amount;
        self.hurt_timer = flash;
        self.hp
    }

    /// Whether a contact hit is allowed on `tick` given the repeat interval.
    pub fn contact_ready(&self, tick: u64, interval: u64) -> bool {
        match self.last_contact {
            Some(last) => tick.saturating_sub(last) >= interval,
            None => true,
        }
    }
}
