//! Simulation core: rules, entities, combat, progression, and the `GameWorld` step.

pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod effects;
pub mod error;
pub mod game_world;
pub mod input;
pub mod inventory;
pub mod mob_registry;
pub mod progression;
pub mod projectile;

pub use config::RuleSet;
pub use error::{ActionError, GameError};
pub use game_world::{GameEvent, GameWorld, Phase};
pub use input::InputState;
pub use progression::{Progress, ShopItem};
