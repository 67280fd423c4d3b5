//! World grid: block ids plus a parallel per-cell durability layer.
//!
//! Cells are stored row-major (`y * width + x`). Reads outside the grid return
//! air and writes outside the grid are ignored, so callers never need to
//! bounds-check before touching the world.

use std::sync::Arc;

use crate::block_registry::{block_id, BlockId, BlockInfo, BlockRegistry};

/// The mutable tile world of one level.
#[derive(Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    blocks: Vec<BlockId>,
    durability: Vec<u8>,
    registry: Arc<BlockRegistry>,
}

impl Grid {
    /// Create a grid filled with air. Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32, registry: Arc<BlockRegistry>) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = (width as usize) * (height as usize);
        Self {
            width,
            height,
            blocks: vec![block_id::AIR; cells],
            durability: vec![1; cells],
            registry,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The registry used to interpret cell ids.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Shared handle to the registry.
    pub fn registry_arc(&self) -> Arc<BlockRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Block id at `(x, y)`, or air outside the grid.
    pub fn get(&self, x: i32, y: i32) -> BlockId {
        self.index(x, y)
            .map(|i| self.blocks[i])
            .unwrap_or(block_id::AIR)
    }

    /// Registry entry for the block at `(x, y)`.
    pub fn info(&self, x: i32, y: i32) -> &'static BlockInfo {
        self.registry.get(self.get(x, y))
    }

    /// Overwrite a cell and reset its durability to the new block's maximum.
    ///
    /// Returns `false` (and changes nothing) outside the grid.
    pub fn set(&mut self, x: i32, y: i32, id: BlockId) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        self.blocks[i] = id;
        self.durability[i] = self.registry.max_durability(id);
        true
    }

    /// Remaining hits before the cell breaks. Outside the grid this reads as 1.
    pub fn durability(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map(|i| self.durability[i]).unwrap_or(1)
    }

    /// Remove one point of durability and return what is left.
    ///
    /// Never goes below zero and never clears the cell: reaching zero is the
    /// caller's signal to break the block. `None` outside the grid.
    pub fn damage(&mut self, x: i32, y: i32) -> Option<u8> {
        let i = self.index(x, y)?;
        self.durability[i] = self.durability[i].saturating_sub(1);
        Some(self.durability[i])
    }

    /// Fill the inclusive rectangle `(x0, y0)..=(x1, y1)` with `id`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, id: BlockId) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.set(x, y, id);
            }
        }
    }

    /// Topmost non-air row in column `x`.
    pub fn surface_y(&self, x: i32) -> Option<i32> {
        (0..self.height).find(|&y| self.get(x, y) != block_id::AIR)
    }

    /// One row of block ids, for renderers. Empty outside the grid.
    pub fn row(&self, y: i32) -> &[BlockId] {
        if y < 0 || y >= self.height {
            return &[];
        }
        let start = (y * self.width) as usize;
        &self.blocks[start..start + self.width as usize]
    }

    /// Number of cells holding `id`.
    pub fn count(&self, id: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == id).count()
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
