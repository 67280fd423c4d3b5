//! Falling water.
//!
//! Water in the grid is static by default. Rule-sets that enable flow call
//! [`settle_water`] on a fixed tick interval; each call moves every water cell
//! that has air directly beneath it down by one row.

use crate::block_registry::block_id;
use crate::grid::Grid;

// ---------------------------------------------------------------------------
// Flow step
// ---------------------------------------------------------------------------

/// Move each unsupported water cell down one row. Returns how many moved.
///
/// Rows are scanned bottom-up (starting at the second-to-last row), so a
/// column of water falls one cell per call rather than teleporting to the
/// bottom in a single pass.
pub fn settle_water(grid: &mut Grid) -> usize {
    let mut moved = 0;
    for y in (0..grid.height() - 1).rev() {
        for x in 0..grid.width() {
            if grid.get(x, y) == block_id::WATER && grid.get(x, y + 1) == block_id::AIR {
                grid.set(x, y + 1, block_id::WATER);
                grid.set(x, y, block_id::AIR);
                moved += 1;
            }
        }
    }
    moved
}

/// Whether `tick` is a flow tick for the given interval. Zero disables flow.
pub fn is_flow_tick(tick: u64, interval: u64) -> bool {
    interval != 0 && tick % interval == 0
}
