//! Player progression: the persisted snapshot and the between-level shop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::components::Player;
use crate::error::{ActionError, GameError};
use crate::inventory::Tool;

/// What survives between sessions. World and mob state are regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub level: u32,
    pub gold: u32,
    pub max_hp: f32,
    pub speed: f32,
    pub damage: f32,
    pub has_wand: bool,
    pub has_axe: bool,
    pub has_spear: bool,
}

impl Progress {
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Capture the progression fields of `player` at `level`.
    pub fn capture(level: u32, player: &Player) -> Self {
        let inv = &player.inventory;
        Self {
            level,
            gold: player.gold,
            max_hp: player.max_hp,
            speed: player.speed,
            damage: player.damage,
            has_wand: inv.owns(Tool::Wand),
            has_axe: inv.owns(Tool::Axe),
            has_spear: inv.owns(Tool::Spear),
        }
    }

    /// Write the stats into `player` and rebuild the inventory from the tool flags.
    pub fn restore(&self, player: &mut Player) {
        player.gold = self.gold;
        player.max_hp = self.max_hp;
        player.hp = player.hp.min(self.max_hp);
        player.speed = self.speed;
        player.damage = self.damage;
        player.inventory.reset();
        for (owned, tool) in [
            (self.has_wand, Tool::Wand),
            (self.has_axe, Tool::Axe),
            (self.has_spear, Tool::Spear),
        ] {
            if owned {
                player.inventory.add_tool(tool);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// Items offered between levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopItem {
    /// +50 hp, capped at max hp.
    Potion,
    /// +10 damage.
    Whetstone,
    /// +1 speed.
    Boots,
    /// +50 max hp and hp.
    Armor,
    Wand,
    Axe,
    Spear,
}

impl ShopItem {
    pub const ALL: [ShopItem; 7] = [
        ShopItem::Potion,
        ShopItem::Whetstone,
        ShopItem::Boots,
        ShopItem::Armor,
        ShopItem::Wand,
        ShopItem::Axe,
        ShopItem::Spear,
    ];

    pub fn price(self) -> u32 {
        match self {
            ShopItem::Potion => 50,
            ShopItem::Whetstone => 200,
            ShopItem::Boots => 150,
            ShopItem::Armor => 300,
            ShopItem::Wand => 500,
            ShopItem::Axe => 400,
            ShopItem::Spear => 450,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShopItem::Potion => "Potion",
            ShopItem::Whetstone => "Whetstone",
            ShopItem::Boots => "Boots",
            ShopItem::Armor => "Armor",
            ShopItem::Wand => "Fire Wand",
            ShopItem::Axe => "Battle Axe",
            ShopItem::Spear => "Trident",
        }
    }

    /// The tool this item grants, if it is a one-time tool purchase.
    pub fn tool(self) -> Option<Tool> {
        match self {
            ShopItem::Wand => Some(Tool::Wand),
            ShopItem::Axe => Some(Tool::Axe),
            ShopItem::Spear => Some(Tool::Spear),
            _ => None,
        }
    }
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShopItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "potion" | "heal" => Ok(ShopItem::Potion),
            "whetstone" | "damage" => Ok(ShopItem::Whetstone),
            "boots" | "speed" => Ok(ShopItem::Boots),
            "armor" | "maxhp" => Ok(ShopItem::Armor),
            "wand" => Ok(ShopItem::Wand),
            "axe" => Ok(ShopItem::Axe),
            "spear" => Ok(ShopItem::Spear),
            other => Err(format!("unknown shop item: {other}")),
        }
    }
}

/// Buy `item` for `player`. Tools can be bought only once.
pub fn purchase(player: &mut Player, item: ShopItem) -> Result<(), ActionError> {
    let price = item.price();
    if player.gold < price {
        return Err(ActionError::InsufficientGold {
            needed: price,
            have: player.gold,
        });
    }
    if let Some(tool) = item.tool() {
        if player.inventory.owns(tool) {
            return Err(ActionError::AlreadyOwned);
        }
    }

    player.gold -= price;
    match item {
        ShopItem::Potion => player.hp = (player.hp + 50.0).min(player.max_hp),
        ShopItem::Whetstone => player.damage += 10.0,
        ShopItem::Boots => player.speed += 1.0,
        ShopItem::Armor => {
            player.max_hp += 50.0;
            player.hp += 50.0;
        }
        ShopItem::Wand | ShopItem::Axe | ShopItem::Spear => {
            if let Some(tool) = item.tool() {
                player.inventory.add_tool(tool);
            }
        }
    }
    Ok(())
}
