//! Error types for the simulation core.

use thiserror::Error;

/// Failures at the crate boundary: configuration, persistence, and lookups.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid rule-set: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to encode rule-set: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
    #[error("invalid progress data: {0}")]
    Progress(#[from] serde_json::Error),
    #[error("unknown mob type: {0}")]
    UnknownMob(String),
    #[error("inventory slot {0} does not exist")]
    InvalidSlot(usize),
}

/// Why an interaction or purchase was refused. A refused action changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action is cooling down")]
    OnCooldown,
    #[error("target is out of reach")]
    OutOfRange,
    #[error("block cannot be broken")]
    Unbreakable,
    #[error("Need Gold! ({needed} needed, {have} held)")]
    InsufficientGold { needed: u32, have: u32 },
    #[error("cell is occupied")]
    Occupied,
    #[error("block would overlap the player")]
    OverlapsPlayer,
    #[error("selected item cannot be placed")]
    NotPlaceable,
    #[error("item already owned")]
    AlreadyOwned,
    #[error("nothing there")]
    Nothing,
}

impl ActionError {
    /// Whether the refusal should be shown to the player as a toast.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            ActionError::InsufficientGold { .. } | ActionError::AlreadyOwned
        )
    }
}
