//! Hotbar inventory: tools and placeable blocks.
//!
//! The inventory is a flat list of slots with one selected index. Tools are
//! never consumed and block slots are unlimited; buying a tool appends it.

use blockhiker_world::block_registry::{block_id, BlockId};

use crate::error::GameError;

/// Item id of the first tool. Block ids stay below this.
pub const FIRST_TOOL_ID: u16 = 100;

/// Hand-held tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Sword,
    Wand,
    Axe,
    Spear,
}

impl Tool {
    /// Stable item id.
    pub fn id(self) -> u16 {
        match self {
            Tool::Sword => 100,
            Tool::Wand => 101,
            Tool::Axe => 102,
            Tool::Spear => 103,
        }
    }

    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            100 => Some(Tool::Sword),
            101 => Some(Tool::Wand),
            102 => Some(Tool::Axe),
            103 => Some(Tool::Spear),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Sword => "sword",
            Tool::Wand => "wand",
            Tool::Axe => "axe",
            Tool::Spear => "spear",
        }
    }
}

/// One hotbar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Tool(Tool),
    Block(BlockId),
}

impl Slot {
    /// Item id: the tool id or the block id.
    pub fn id(self) -> u16 {
        match self {
            Slot::Tool(t) => t.id(),
            Slot::Block(b) => b,
        }
    }

    pub fn from_id(id: u16) -> Self {
        match Tool::from_id(id) {
            Some(tool) => Slot::Tool(tool),
            None => Slot::Block(id),
        }
    }
}

const DEFAULT_LOADOUT: [Slot; 11] = [
    Slot::Tool(Tool::Sword),
    Slot::Block(block_id::DIRT),
    Slot::Block(block_id::STONE),
    Slot::Block(block_id::WOOD),
    Slot::Block(block_id::PLANK),
    Slot::Block(block_id::TNT),
    Slot::Block(block_id::GLASS),
    Slot::Block(block_id::WATER),
    Slot::Block(block_id::LAVA),
    Slot::Block(block_id::ICE),
    Slot::Block(block_id::BOUNCE),
];

/// The player's hotbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: Vec<Slot>,
    selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: DEFAULT_LOADOUT.to_vec(),
            selected: 0,
        }
    }
}

impl Inventory {
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected slot. The loadout is never empty, so this is always valid.
    pub fn selected(&self) -> Slot {
        self.slots
            .get(self.selected)
            .copied()
            .unwrap_or(Slot::Tool(Tool::Sword))
    }

    /// Select slot `index`.
    pub fn select(&mut self, index: usize) -> Result<(), GameError> {
        if index >= self.slots.len() {
            return Err(GameError::InvalidSlot(index));
        }
        self.selected = index;
        Ok(())
    }

    /// Select the first slot holding `slot`, if present.
    pub fn select_item(&mut self, slot: Slot) -> bool {
        match self.slots.iter().position(|&s| s == slot) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    pub fn owns(&self, tool: Tool) -> bool {
        self.slots.contains(&Slot::Tool(tool))
    }

    /// Append a tool. Returns `false` if it was already owned.
    pub fn add_tool(&mut self, tool: Tool) -> bool {
        if self.owns(tool) {
            return false;
        }
        self.slots.push(Slot::Tool(tool));
        true
    }

    /// Back to the default loadout with the first slot selected.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
