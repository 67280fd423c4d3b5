use std::path::Path;

use blockhiker_game::config::Preset;
use blockhiker_game::progression::ShopItem;
use blockhiker_game::{GameError, RuleSet};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub sim: SimSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub autopilot: AutopilotSection,
    /// Field-by-field overrides applied on top of the preset.
    #[serde(default)]
    pub rules: Option<toml::Table>,
}

#[derive(Debug, Deserialize)]
pub struct SimSection {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Steps to run. Ignored in realtime mode, which runs until Ctrl+C.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_start_level")]
    pub start_level: u32,
    #[serde(default)]
    pub realtime: bool,
    /// Step period in realtime mode.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    #[serde(default)]
    pub preset: Preset,
    /// JSON progress file read at start and written on exit.
    #[serde(default)]
    pub progress_file: Option<String>,
}

fn default_seed() -> u64 {
    1
}

fn default_ticks() -> u64 {
    3600
}

fn default_start_level() -> u32 {
    1
}

fn default_tick_millis() -> u64 {
    16
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            ticks: default_ticks(),
            start_level: default_start_level(),
            realtime: false,
            tick_millis: default_tick_millis(),
            preset: Preset::default(),
            progress_file: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutopilotSection {
    /// Bought in order whenever a level is completed.
    #[serde(default = "default_shopping_list")]
    pub shopping_list: Vec<ShopItem>,
    /// Steps without progress before the pilot starts digging.
    #[serde(default = "default_stuck_threshold")]
    pub stuck_threshold: u32,
}

fn default_shopping_list() -> Vec<ShopItem> {
    vec![ShopItem::Potion]
}

fn default_stuck_threshold() -> u32 {
    20
}

impl Default for AutopilotSection {
    fn default() -> Self {
        Self {
            shopping_list: default_shopping_list(),
            stuck_threshold: default_stuck_threshold(),
        }
    }
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The preset with `[rules]` applied.
    pub fn rules(&self) -> Result<RuleSet, GameError> {
        let base = self.sim.preset.rules();
        match &self.rules {
            Some(overrides) => base.with_overrides(overrides),
            None => Ok(base),
        }
    }
}
