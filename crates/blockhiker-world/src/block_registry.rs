//! Block property registry mapping block ids to their physical properties.
//!
//! Provides solidity, durability, surface and hazard data for every block the
//! world can hold. Unknown ids fail open: they behave as passable, non-hard
//! cells with no special properties.

use std::collections::HashMap;

/// Numeric block identifier stored in every grid cell.
pub type BlockId = u16;

/// Well-known block ids.
pub mod block_id {
    use super::BlockId;

    pub const AIR: BlockId = 0;
    pub const DIRT: BlockId = 1;
    pub const GRASS: BlockId = 2;
    pub const STONE: BlockId = 3;
    pub const WOOD: BlockId = 4;
    pub const LEAVES: BlockId = 5;
    pub const BRICK: BlockId = 6;
    pub const SAND: BlockId = 7;
    pub const SNOW: BlockId = 8;
    pub const COAL_ORE: BlockId = 9;
    pub const GOLD_ORE: BlockId = 10;
    pub const DIAMOND_ORE: BlockId = 11;
    pub const TNT: BlockId = 12;
    pub const GLASS: BlockId = 13;
    pub const PLANK: BlockId = 14;
    pub const SPIKE: BlockId = 15;
    pub const WATER: BlockId = 20;
    pub const LAVA: BlockId = 21;
    pub const ICE: BlockId = 22;
    pub const BOUNCE: BlockId = 23;
    pub const GOAL: BlockId = 99;
}

/// How a block hurts whatever touches or occupies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    None,
    /// Damages and launches the player on touch; never blocks movement.
    Spike,
    /// Periodic damage while an entity's center is inside it.
    Lava,
}

/// Properties for a single block type.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub id: BlockId,
    /// Lowercase display name, e.g. `"stone"`.
    pub name: &'static str,
    /// Occupies its cell (anything that is neither empty nor fluid).
    pub solid: bool,
    pub fluid: bool,
    /// Decorative overlay (leaves, glass): walkable and replaceable by building.
    pub translucent: bool,
    /// Hits needed to break. `1` for every non-hard block.
    pub max_durability: u8,
    /// Friction coefficient used instead of the ground default when standing on it.
    pub friction: Option<f32>,
    /// Jump multiplier when jumping off it.
    pub bounce: Option<f32>,
    pub hazard: Hazard,
    /// Gold paid when the block is mined out.
    pub value: u32,
    /// Cannot be mined.
    pub unbreakable: bool,
    /// Survives explosions.
    pub blast_proof: bool,
    /// Occupying it completes the level.
    pub goal: bool,
    /// Collapses a short while after the player stands on it.
    pub crumbles: bool,
    /// Mining it arms a fuse instead of breaking it.
    pub explosive: bool,
}

impl BlockInfo {
    const fn new(id: BlockId, name: &'static str) -> Self {
        Self {
            id,
            name,
            solid: true,
            fluid: false,
            translucent: false,
            max_durability: 1,
            friction: None,
            bounce: None,
            hazard: Hazard::None,
            value: 0,
            unbreakable: false,
            blast_proof: false,
            goal: false,
            crumbles: false,
            explosive: false,
        }
    }

    const fn empty(mut self) -> Self {
        self.solid = false;
        self
    }

    const fn fluid(mut self) -> Self {
        self.solid = false;
        self.fluid = true;
        self
    }

    const fn translucent(mut self) -> Self {
        self.translucent = true;
        self
    }

    const fn hard(mut self, hits: u8) -> Self {
        self.max_durability = hits;
        self
    }

    const fn value(mut self, gold: u32) -> Self {
        self.value = gold;
        self
    }

    const fn friction(mut self, coefficient: f32) -> Self {
        self.friction = Some(coefficient);
        self
    }

    const fn bounce(mut self, multiplier: f32) -> Self {
        self.bounce = Some(multiplier);
        self
    }

    const fn hazard(mut self, hazard: Hazard) -> Self {
        self.hazard = hazard;
        self
    }

    const fn blast_proof(mut self) -> Self {
        self.blast_proof = true;
        self
    }

    const fn goal(mut self) -> Self {
        self.goal = true;
        self.unbreakable = true;
        self.blast_proof = true;
        self
    }

    const fn crumbles(mut self) -> Self {
        self.crumbles = true;
        self
    }

    const fn explosive(mut self) -> Self {
        self.explosive = true;
        self
    }

    /// Whether this is the empty block.
    pub fn is_air(&self) -> bool {
        self.id == block_id::AIR
    }

    /// Whether the block takes more than one hit to break.
    pub fn is_hard(&self) -> bool {
        self.max_durability > 1
    }

    /// Whether an entity's bounding box is stopped by this block.
    ///
    /// Goals, translucent overlays and spikes occupy their cell but never block.
    pub fn blocks_movement(&self) -> bool {
        self.solid && !self.goal && !self.translucent && self.hazard != Hazard::Spike
    }
}

/// Registry mapping block ids to block info.
pub struct BlockRegistry {
    blocks: HashMap<BlockId, &'static BlockInfo>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Build the registry from the static block table.
    pub fn new() -> Self {
        let mut blocks = HashMap::with_capacity(BLOCK_DATA.len());
        for info in BLOCK_DATA {
            blocks.insert(info.id, info);
        }
        Self { blocks }
    }

    /// Look up block info. Unknown ids resolve to a passable placeholder.
    pub fn get(&self, id: BlockId) -> &'static BlockInfo {
        self.blocks.get(&id).copied().unwrap_or(&UNKNOWN)
    }

    /// Whether the id has a registry entry.
    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    /// Starting durability for a freshly written cell of this block.
    pub fn max_durability(&self, id: BlockId) -> u8 {
        self.get(id).max_durability.max(1)
    }

    /// All registered blocks, in table order.
    pub fn all(&self) -> &'static [BlockInfo] {
        BLOCK_DATA
    }
}

/// Placeholder returned for ids missing from the table.
static UNKNOWN: BlockInfo = BlockInfo::new(BlockId::MAX, "unknown").empty();

/// Static data array of all block properties.
static BLOCK_DATA: &[BlockInfo] = &[
    BlockInfo::new(block_id::AIR, "air").empty(),
    BlockInfo::new(block_id::DIRT, "dirt"),
    BlockInfo::new(block_id::GRASS, "grass"),
    BlockInfo::new(block_id::STONE, "stone").hard(3),
    BlockInfo::new(block_id::WOOD, "wood"),
    BlockInfo::new(block_id::LEAVES, "leaves").translucent(),
    BlockInfo::new(block_id::BRICK, "brick").blast_proof(),
    BlockInfo::new(block_id::SAND, "sand"),
    BlockInfo::new(block_id::SNOW, "snow"),
    BlockInfo::new(block_id::COAL_ORE, "coal_ore").hard(3).value(5),
    BlockInfo::new(block_id::GOLD_ORE, "gold_ore").hard(3).value(15),
    BlockInfo::new(block_id::DIAMOND_ORE, "diamond_ore").hard(3).value(50),
    BlockInfo::new(block_id::TNT, "tnt").explosive(),
    BlockInfo::new(block_id::GLASS, "glass").translucent(),
    BlockInfo::new(block_id::PLANK, "plank").crumbles(),
    BlockInfo::new(block_id::SPIKE, "spike").hazard(Hazard::Spike),
    BlockInfo::new(block_id::WATER, "water").fluid(),
    BlockInfo::new(block_id::LAVA, "lava").fluid().hazard(Hazard::Lava),
    BlockInfo::new(block_id::ICE, "ice").friction(0.98),
    BlockInfo::new(block_id::BOUNCE, "bounce").bounce(1.6),
    BlockInfo::new(block_id::GOAL, "goal").goal(),
];
