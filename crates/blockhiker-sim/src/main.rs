mod autopilot;
mod config;

use std::path::Path;
use std::time::Duration;

use autopilot::Autopilot;
use blockhiker_game::progression::Progress;
use blockhiker_game::{GameEvent, GameWorld, Phase};
use config::SimConfig;
use tracing::{debug, info, trace, warn};

/// Counters reported when the run ends.
#[derive(Debug, Default)]
struct RunStats {
    ticks: u64,
    levels_completed: u32,
    deaths: u32,
    kills: u32,
    blocks_mined: u32,
    explosions: u32,
}

impl RunStats {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LevelComplete { level, bonus } => {
                self.levels_completed += 1;
                info!(level, bonus, "Level complete");
            }
            GameEvent::PlayerDied { level } => {
                self.deaths += 1;
                info!(level, "Player died");
            }
            GameEvent::MobKilled {
                name,
                reward,
                combo,
            } => {
                self.kills += 1;
                debug!(mob = name, reward, combo, "Kill");
            }
            GameEvent::BossDefeated { name } => info!(boss = name, "Boss defeated"),
            GameEvent::BlockMined { .. } => self.blocks_mined += 1,
            GameEvent::Exploded { .. } => self.explosions += 1,
            GameEvent::Toast { message, error } => debug!(error, "{message}"),
            GameEvent::Purchased { item } => info!(%item, "Purchased"),
            other => trace!(event = ?other, "Event"),
        }
    }
}

/// Advance the session by one step: play, shop or restart depending on phase.
fn step(world: &mut GameWorld, pilot: &mut Autopilot, stats: &mut RunStats) {
    match world.phase() {
        Phase::Playing => {
            let input = pilot.input(world);
            world.tick(&input);
        }
        Phase::Shop => {
            pilot.shop(world);
            world.next_level();
        }
        Phase::Dead => world.restart(),
    }
    stats.ticks += 1;
    for event in world.drain_events() {
        stats.record(&event);
    }
}

fn load_progress(world: &mut GameWorld, path: &Path) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No saved progress");
            return;
        }
    };
    match Progress::from_json(&json) {
        Ok(progress) => world.apply_progress(&progress),
        Err(e) => warn!(path = %path.display(), error = %e, "Ignoring unreadable progress file"),
    }
}

fn save_progress(world: &GameWorld, path: &Path) {
    let result = world
        .progress()
        .to_json()
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => info!(path = %path.display(), "Progress saved"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to save progress"),
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "sim.toml".into());
    let config = match SimConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "Blockhiker sim v{} (seed {}, preset {:?})",
        env!("CARGO_PKG_VERSION"),
        config.sim.seed,
        config.sim.preset
    );

    let rules = match config.rules() {
        Ok(rules) => rules,
        Err(e) => {
            warn!(error = %e, "Rejected [rules] overrides, using preset values");
            config.sim.preset.rules()
        }
    };

    let mut world = GameWorld::new(rules, config.sim.seed);
    let progress_path = config.sim.progress_file.as_deref().map(Path::new);
    if let Some(path) = progress_path {
        load_progress(&mut world, path);
    }
    if progress_path.is_none() && config.sim.start_level > 1 {
        world.load_level(config.sim.start_level);
    }

    let mut pilot = Autopilot::new(config.autopilot.clone());
    let mut stats = RunStats::default();

    if config.sim.realtime {
        info!(period_ms = config.sim.tick_millis, "Running in realtime, Ctrl+C to stop");
        let mut tick_interval =
            tokio::time::interval(Duration::from_millis(config.sim.tick_millis.max(1)));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                _ = tick_interval.tick() => step(&mut world, &mut pilot, &mut stats),
                _ = &mut ctrl_c => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    } else {
        for _ in 0..config.sim.ticks {
            step(&mut world, &mut pilot, &mut stats);
        }
    }

    let hud = world.hud();
    info!(
        ticks = stats.ticks,
        level = hud.level,
        gold = hud.gold,
        hp = hud.hp,
        levels = stats.levels_completed,
        deaths = stats.deaths,
        kills = stats.kills,
        mined = stats.blocks_mined,
        explosions = stats.explosions,
        "Run finished"
    );

    if let Some(path) = progress_path {
        save_progress(&world, path);
    }
}
