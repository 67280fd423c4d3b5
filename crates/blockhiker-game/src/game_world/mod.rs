//! The simulation controller.
//!
//! `GameWorld` owns the grid, the player, mobs, projectiles and timed hazards
//! of the current level, plus the random source every stochastic decision draws
//! from. One call to [`GameWorld::tick`] runs a full step in a fixed order:
//!
//! 1. player movement, environment and collision
//! 2. interaction (mine / place / attack)
//! 3. goal and death checks
//! 4. armed TNT
//! 5. mobs
//! 6. projectiles
//! 7. particles and floating text
//!
//! Presentation collaborators never get called from inside the step. Everything
//! they care about is pushed to an outbox and collected with
//! [`GameWorld::drain_events`].

mod explosion;
mod interaction;
mod mobs;
mod player;
mod projectiles;

use std::sync::Arc;

use blockhiker_world::block_registry::{BlockId, BlockRegistry};
use blockhiker_world::fluid;
use blockhiker_world::grid::Grid;
use blockhiker_world::physics::sample_center;
use blockhiker_world::terrain;
use blockhiker_world::TILE_SIZE;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::ai::spawning;
use crate::components::{DamageSource, Mob, Player};
use crate::config::RuleSet;
use crate::effects::{color, Countdown, Effects, Weather};
use crate::error::{ActionError, GameError};
use crate::input::InputState;
use crate::inventory::Tool;
use crate::mob_registry::MobRegistry;
use crate::progression::{self, Progress, ShopItem};
use crate::projectile::Projectile;

/// Horizontal distance within which a living boss shows its health bar.
const BOSS_BAR_RANGE: f32 = 1000.0;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Domain events produced by the step, consumed by HUD, audio and renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jumped,
    Dashed,
    PlayerHurt {
        amount: f32,
        hp: f32,
        source: DamageSource,
    },
    PlayerDied {
        level: u32,
    },
    BlockMined {
        x: i32,
        y: i32,
        id: BlockId,
        reward: u32,
    },
    BlockDamaged {
        x: i32,
        y: i32,
        remaining: u8,
    },
    BlockPlaced {
        x: i32,
        y: i32,
        id: BlockId,
        cost: u32,
    },
    TntIgnited {
        x: i32,
        y: i32,
    },
    Crumbled {
        x: i32,
        y: i32,
    },
    Attacked {
        tool: Tool,
    },
    /// `index` is the mob's position in the mob list when it was hit.
    MobHurt {
        index: usize,
        damage: f32,
        hp: f32,
    },
    MobKilled {
        name: &'static str,
        reward: u32,
        combo: u32,
    },
    BossDefeated {
        name: &'static str,
    },
    Exploded {
        x: i32,
        y: i32,
        radius: f32,
    },
    LevelComplete {
        level: u32,
        bonus: u32,
    },
    /// A short user-facing message.
    Toast {
        message: String,
        error: bool,
    },
    Purchased {
        item: ShopItem,
    },
}

/// Events queued during a step.
#[derive(Debug, Default)]
pub struct OutgoingEvents {
    pub events: Vec<GameEvent>,
}

impl OutgoingEvents {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Top-level game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Level complete; waiting for `next_level`.
    Shop,
    /// Waiting for `restart`.
    Dead,
}

/// Player vitals for the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub hp: f32,
    pub max_hp: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub breath: f32,
    pub gold: u32,
    pub level: u32,
    pub combo: u32,
    pub submerged: bool,
    pub selected_slot: usize,
    pub phase: Phase,
}

/// Health bar of a nearby boss.
#[derive(Debug, Clone, PartialEq)]
pub struct BossBar {
    pub name: &'static str,
    pub hp: f32,
    pub max_hp: f32,
}

// ---------------------------------------------------------------------------
// GameWorld
// ---------------------------------------------------------------------------

/// Complete simulation state of one game session.
pub struct GameWorld {
    rules: Arc<RuleSet>,
    registry: Arc<BlockRegistry>,
    mob_registry: MobRegistry,
    rng: StdRng,
    pub grid: Grid,
    pub player: Player,
    pub mobs: Vec<Mob>,
    pub projectiles: Vec<Projectile>,
    pub effects: Effects,
    pub armed_tnt: Vec<Countdown>,
    pub crumbles: Vec<Countdown>,
    weather: Weather,
    level: u32,
    tick: u64,
    phase: Phase,
    combo: u32,
    combo_timer: u32,
    outgoing: OutgoingEvents,
}

impl GameWorld {
    /// Start a new session on level 1. All randomness derives from `seed`.
    pub fn new(rules: RuleSet, seed: u64) -> Self {
        let registry = Arc::new(BlockRegistry::new());
        let grid = Grid::new(0, 0, Arc::clone(&registry));
        let mut world = Self::with_grid(grid, (0.0, 0.0), rules, seed);
        world.load_level(1);
        world
    }

    /// Build a session around a hand-made grid. No mobs are spawned.
    pub fn from_grid(grid: Grid, spawn: (f32, f32), rules: RuleSet, seed: u64) -> Self {
        let world = Self::with_grid(grid, spawn, rules, seed);
        debug!(
            width = world.grid.width(),
            height = world.grid.height(),
            "Created world from grid"
        );
        world
    }

    fn with_grid(grid: Grid, spawn: (f32, f32), rules: RuleSet, seed: u64) -> Self {
        Self {
            rules: Arc::new(rules),
            registry: grid.registry_arc(),
            mob_registry: MobRegistry::new(),
            rng: StdRng::seed_from_u64(seed),
            grid,
            player: Player::new(spawn.0, spawn.1),
            mobs: Vec::new(),
            projectiles: Vec::new(),
            effects: Effects::default(),
            armed_tnt: Vec::new(),
            crumbles: Vec::new(),
            weather: Weather::Clear,
            level: 1,
            tick: 0,
            phase: Phase::Playing,
            combo: 0,
            combo_timer: 0,
            outgoing: OutgoingEvents::default(),
        }
    }

    // -- level control ------------------------------------------------------

    /// Replace the grid and every entity list with a freshly generated level.
    /// Player stats, gold and inventory carry over.
    pub fn load_level(&mut self, level: u32) {
        let level = level.clamp(1, terrain::MAX_LEVEL);
        let terrain = terrain::generate(level, Arc::clone(&self.registry), &mut self.rng);
        let spawns = spawning::plan_spawns(&terrain, &self.mob_registry, &mut self.rng);
        self.weather = Weather::roll(level, &mut self.rng);

        self.mobs = spawns
            .into_iter()
            .map(|s| Mob::from_definition(s.def, s.x, s.y))
            .collect();
        self.grid = terrain.grid;
        self.projectiles.clear();
        self.effects.clear();
        self.armed_tnt.clear();
        self.crumbles.clear();
        self.combo = 0;
        self.combo_timer = 0;
        self.player.respawn_at(terrain.spawn);
        self.level = level;
        self.phase = Phase::Playing;

        info!(
            level,
            width = self.grid.width(),
            mobs = self.mobs.len(),
            weather = ?self.weather,
            "Level loaded"
        );
        if let Some(boss) = self.mobs.iter().find(|m| m.is_boss()) {
            info!(boss = boss.name, "Boss spawned");
        }
    }

    /// Advance to the next level.
    pub fn next_level(&mut self) {
        self.load_level(self.level + 1);
    }

    /// Back to level 1 with full health, no gold and the default loadout.
    /// Purchased stat upgrades are kept.
    pub fn restart(&mut self) {
        self.player.hp = self.player.max_hp;
        self.player.gold = 0;
        self.player.inventory.reset();
        info!("Restarting from level 1");
        self.load_level(1);
    }

    // -- step ---------------------------------------------------------------

    /// Run one simulation step. Does nothing outside [`Phase::Playing`].
    pub fn tick(&mut self, input: &InputState) {
        if self.phase != Phase::Playing {
            return;
        }
        self.tick += 1;
        self.player.invulnerable = self.player.invulnerable.saturating_sub(1);
        if self.combo_timer > 0 {
            self.combo_timer -= 1;
        } else {
            self.combo = 0;
        }
        if fluid::is_flow_tick(self.tick, self.rules.water_flow_interval) {
            fluid::settle_water(&mut self.grid);
        }

        self.step_player(input);
        self.interact(input);
        if self.check_goal_and_death() {
            return;
        }
        self.step_tnt();
        self.step_mobs();
        self.step_projectiles();
        self.effects.tick();
    }

    /// Returns `true` if the phase changed. Death wins over reaching the goal
    /// in the same step.
    fn check_goal_and_death(&mut self) -> bool {
        let floor = self.grid.height() as f32 * TILE_SIZE + self.rules.death_margin;
        if self.player.body.y > floor || self.player.is_dead() {
            self.die();
            return true;
        }
        if sample_center(&self.player.body, &self.grid).info.goal {
            self.complete_level();
            return true;
        }
        false
    }

    fn complete_level(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let bonus = self.rules.level_bonus;
        self.player.gold += bonus;
        self.phase = Phase::Shop;
        info!(level = self.level, bonus, gold = self.player.gold, "Level complete");
        self.emit(GameEvent::LevelComplete {
            level: self.level,
            bonus,
        });
    }

    fn die(&mut self) {
        self.phase = Phase::Dead;
        info!(level = self.level, "Player died");
        self.emit(GameEvent::PlayerDied { level: self.level });
    }

    fn step_tnt(&mut self) {
        let radius = self.rules.tnt_radius;
        for (x, y) in crate::effects::tick_countdowns(&mut self.armed_tnt) {
            self.explode(x, y, radius, true);
        }
    }

    // -- shared helpers -----------------------------------------------------

    fn emit(&mut self, event: GameEvent) {
        self.outgoing.push(event);
    }

    fn toast(&mut self, message: impl Into<String>, error: bool) {
        self.emit(GameEvent::Toast {
            message: message.into(),
            error,
        });
    }

    /// Damage the player through the invulnerability window.
    fn hurt_player(&mut self, amount: f32, source: DamageSource) -> bool {
        if amount <= 0.0 {
            return false;
        }
        let window = self.rules.hurt_invulnerability;
        if !self.player.hurt(amount, source, window) {
            return false;
        }
        let (x, y) = (self.player.body.x, self.player.body.y);
        self.effects.text(x, y, format!("-{amount}"), color::DAMAGE);
        self.emit(GameEvent::PlayerHurt {
            amount,
            hp: self.player.hp,
            source,
        });
        true
    }

    // -- public API ---------------------------------------------------------

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outgoing.events)
    }

    /// Add a mob of type `key` at a top-left pixel position. Returns its index.
    pub fn spawn_mob(&mut self, key: &str, x: f32, y: f32) -> Result<usize, GameError> {
        let def = self
            .mob_registry
            .get(key)
            .ok_or_else(|| GameError::UnknownMob(key.to_string()))?;
        self.mobs.push(Mob::from_definition(def, x, y));
        if def.is_boss() {
            info!(boss = def.display_name, "Boss spawned");
        }
        Ok(self.mobs.len() - 1)
    }

    pub fn select_slot(&mut self, index: usize) -> Result<(), GameError> {
        self.player.inventory.select(index)
    }

    /// Buy a shop item. Outcomes are also reported as toasts.
    pub fn purchase(&mut self, item: ShopItem) -> Result<(), ActionError> {
        match progression::purchase(&mut self.player, item) {
            Ok(()) => {
                debug!(%item, gold = self.player.gold, "Purchased");
                self.emit(GameEvent::Purchased { item });
                self.toast(format!("Purchased {item}!"), false);
                Ok(())
            }
            Err(e) => {
                if e.is_user_visible() {
                    self.toast(e.to_string(), true);
                }
                Err(e)
            }
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let p = &self.player;
        HudSnapshot {
            hp: p.hp,
            max_hp: p.max_hp,
            stamina: p.stamina,
            max_stamina: p.max_stamina,
            breath: p.breath,
            gold: p.gold,
            level: self.level,
            combo: self.combo,
            submerged: p.submerged,
            selected_slot: p.inventory.selected_index(),
            phase: self.phase,
        }
    }

    /// The boss bar, when a living boss is near the player.
    pub fn boss_bar(&self) -> Option<BossBar> {
        self.mobs
            .iter()
            .find(|m| {
                m.is_boss()
                    && !m.is_dead()
                    && (self.player.body.x - m.body.x).abs() < BOSS_BAR_RANGE
            })
            .map(|m| BossBar {
                name: m.name,
                hp: m.hp,
                max_hp: m.max_hp,
            })
    }

    /// Snapshot of the persisted progression fields.
    pub fn progress(&self) -> Progress {
        Progress::capture(self.level, &self.player)
    }

    /// Restore saved progression and regenerate its level.
    pub fn apply_progress(&mut self, progress: &Progress) {
        progress.restore(&mut self.player);
        self.player.hp = self.player.max_hp;
        info!(level = progress.level, gold = progress.gold, "Progress restored");
        self.load_level(progress.level);
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steps run since the session started.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }
}


#[cfg(test)]
mod tests {
    use blockhiker_world::block_registry::block_id;

    use super::testing::{idle, room};
    use super::*;

    #[test]
    fn new_world_loads_level_one() {
        let world = GameWorld::new(RuleSet::classic(), 42);
        assert_eq!(world.level(), 1);
        assert_eq!(world.phase(), Phase::Playing);
        assert_eq!(world.grid.width(), 160);
        assert_eq!(world.grid.count(block_id::GOAL), 1);
        assert_eq!(world.player.body.x, 200.0);
    }

    #[test]
    fn same_seed_same_session() {
        let a = GameWorld::new(RuleSet::classic(), 9);
        let b = GameWorld::new(RuleSet::classic(), 9);
        assert_eq!(a.mobs.len(), b.mobs.len());
        assert_eq!(a.weather(), b.weather());
        for y in 0..a.grid.height() {
            assert_eq!(a.grid.row(y), b.grid.row(y));
        }
    }

    #[test]
    fn standing_still_is_stable() {
        let mut world = room(RuleSet::classic());
        let start = world.player.body;
        idle(&mut world, 30);
        assert!(world.player.body.grounded);
        assert!((world.player.body.y - start.y).abs() < 1e-3);
        assert_eq!(world.tick_count(), 30);
    }

    #[test]
    fn reaching_goal_opens_shop_once() {
        let mut world = room(RuleSet::classic());
        world.grid.set(2, 9, block_id::GOAL);
        world.tick(&InputState::idle());
        assert_eq!(world.phase(), Phase::Shop);
        assert_eq!(world.player.gold, 200);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::LevelComplete { level: 1, bonus: 200 }));

        // The step is frozen outside Playing.
        idle(&mut world, 5);
        assert_eq!(world.player.gold, 200);
        assert_eq!(world.tick_count(), 1);
    }

    #[test]
    fn dying_on_the_goal_is_still_death() {
        let mut world = room(RuleSet::classic());
        world.grid.set(2, 9, block_id::GOAL);
        world.player.hp = 0.0;
        world.tick(&InputState::idle());
        assert_eq!(world.phase(), Phase::Dead);
        assert_eq!(world.player.gold, 0);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::PlayerDied { level: 1 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })));
    }

    #[test]
    fn falling_out_of_the_world_kills() {
        let mut world = room(RuleSet::classic());
        world.player.body.y = 12.0 * TILE_SIZE + 250.0;
        world.tick(&InputState::idle());
        assert_eq!(world.phase(), Phase::Dead);
        assert!(world
            .drain_events()
            .contains(&GameEvent::PlayerDied { level: 1 }));
    }

    #[test]
    fn zero_hp_kills() {
        let mut world = room(RuleSet::classic());
        world.player.hp = 0.0;
        world.tick(&InputState::idle());
        assert_eq!(world.phase(), Phase::Dead);
    }

    #[test]
    fn restart_keeps_upgrades_and_resets_loadout() {
        let mut world = GameWorld::new(RuleSet::classic(), 3);
        world.player.gold = 2000;
        world.purchase(ShopItem::Axe).unwrap();
        world.purchase(ShopItem::Whetstone).unwrap();
        world.player.hp = 10.0;
        world.restart();
        assert_eq!(world.level(), 1);
        assert_eq!(world.player.gold, 0);
        assert_eq!(world.player.hp, world.player.max_hp);
        assert_eq!(world.player.damage, 25.0);
        assert!(!world.player.inventory.owns(Tool::Axe));
    }

    #[test]
    fn next_level_replaces_world() {
        let mut world = GameWorld::new(RuleSet::classic(), 3);
        world.player.gold = 77;
        world.next_level();
        assert_eq!(world.level(), 2);
        assert_eq!(world.grid.width(), 170);
        assert_eq!(world.player.gold, 77);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn boss_level_shows_bar_only_nearby() {
        let mut world = GameWorld::new(RuleSet::classic(), 5);
        world.load_level(3);
        assert!(world.mobs.iter().any(|m| m.is_boss()));
        assert!(world.boss_bar().is_none());
        let boss_x = world.mobs.iter().find(|m| m.is_boss()).unwrap().body.x;
        world.player.body.x = boss_x - 500.0;
        let bar = world.boss_bar().unwrap();
        assert_eq!(bar.name, "KING SLIME");
        assert_eq!(bar.max_hp, 600.0);
    }

    #[test]
    fn unknown_mob_is_rejected() {
        let mut world = room(RuleSet::classic());
        assert!(matches!(
            world.spawn_mob("dragon", 0.0, 0.0),
            Err(GameError::UnknownMob(_))
        ));
        assert_eq!(world.spawn_mob("rat", 400.0, 300.0).unwrap(), 0);
    }

    #[test]
    fn slot_selection() {
        let mut world = room(RuleSet::classic());
        assert!(world.select_slot(4).is_ok());
        assert_eq!(world.hud().selected_slot, 4);
        assert!(matches!(world.select_slot(40), Err(GameError::InvalidSlot(40))));
    }

    #[test]
    fn purchase_reports_toasts() {
        let mut world = room(RuleSet::classic());
        assert!(world.purchase(ShopItem::Boots).is_err());
        world.player.gold = 150;
        assert!(world.purchase(ShopItem::Boots).is_ok());
        let events = world.drain_events();
        assert!(matches!(&events[0], GameEvent::Toast { error: true, .. }));
        assert!(events.contains(&GameEvent::Purchased { item: ShopItem::Boots }));
        assert_eq!(world.player.speed, 7.0);
    }

    #[test]
    fn progress_round_trip_through_world() {
        let mut world = GameWorld::new(RuleSet::classic(), 1);
        world.player.gold = 900;
        world.purchase(ShopItem::Wand).unwrap();
        let saved = Progress {
            level: 4,
            ..world.progress()
        };
        let mut other = GameWorld::new(RuleSet::classic(), 2);
        other.apply_progress(&saved);
        assert_eq!(other.level(), 4);
        assert_eq!(other.player.gold, 400);
        assert!(other.player.inventory.owns(Tool::Wand));
        assert_eq!(other.hud().level, 4);
    }

    #[test]
    fn oversized_saved_level_is_capped() {
        let mut world = GameWorld::new(RuleSet::classic(), 1);
        let saved = Progress {
            level: u32::MAX,
            ..world.progress()
        };
        world.apply_progress(&saved);
        assert_eq!(world.level(), terrain::MAX_LEVEL);
        assert_eq!(world.grid.width(), terrain::level_width(terrain::MAX_LEVEL));
        assert_eq!(world.phase(), Phase::Playing);
    }

    #[test]
    fn combo_expires() {
        let mut world = room(RuleSet::classic());
        world.combo = 3;
        world.combo_timer = 2;
        idle(&mut world, 2);
        assert_eq!(world.combo(), 3);
        idle(&mut world, 1);
        assert_eq!(world.combo(), 0);
    }

    #[test]
    fn arcade_water_falls_during_step() {
        let mut world = room(RuleSet::arcade());
        world.grid.set(10, 2, block_id::WATER);
        idle(&mut world, 5);
        assert_eq!(world.grid.get(10, 2), block_id::AIR);
        assert_eq!(world.grid.get(10, 3), block_id::WATER);
    }
}
