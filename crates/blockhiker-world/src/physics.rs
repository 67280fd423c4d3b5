//! Axis-separated AABB collision against the tile grid.
//!
//! Every moving entity (player, mobs) integrates horizontally first, resolves
//! that axis, then integrates and resolves vertically. Each resolve pass
//! corrects at most one blocking tile.

use crate::block_registry::BlockInfo;
use crate::grid::Grid;
use crate::{tile_of, TILE_SIZE};

/// Subtracted from far edges so a box flush against a tile boundary does not
/// register the next tile.
pub const EDGE_EPSILON: f32 = 0.01;

/// Distance below the feet used to sample the standing surface.
const SURFACE_PROBE: f32 = 2.0;

/// Horizontal/vertical reach of the forward obstacle probe.
const OBSTACLE_PROBE: f32 = 5.0;

/// Axis-aligned bounding box in world pixels. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Inclusive tile range covered by a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpan {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box covering one tile.
    pub fn tile(tx: i32, ty: i32) -> Self {
        Self::new(tx as f32 * TILE_SIZE, ty as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test; touching edges do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Whether `(px, py)` lies strictly inside the box.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px > self.x && px < self.x + self.width && py > self.y && py < self.y + self.height
    }

    /// Tiles the box touches, with the epsilon applied to the far edges.
    pub fn tile_span(&self) -> TileSpan {
        TileSpan {
            left: tile_of(self.x),
            right: tile_of(self.x + self.width - EDGE_EPSILON),
            top: tile_of(self.y),
            bottom: tile_of(self.y + self.height - EDGE_EPSILON),
        }
    }

    /// Iterate intersecting tile positions in row-major order.
    pub fn intersecting_tiles(&self) -> impl Iterator<Item = (i32, i32)> {
        let span = self.tile_span();
        (span.top..=span.bottom).flat_map(move |y| (span.left..=span.right).map(move |x| (x, y)))
    }
}

/// Which component of motion a resolve pass corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Physical state shared by every grid-colliding entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.aabb().center()
    }
}

/// Outcome of one resolve pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Tile that stopped the body, if any.
    pub blocked_by: Option<(i32, i32)>,
    /// A spike was touched and the launch impulse applied.
    pub hazard: bool,
}

/// Resolve `body` against the grid along one axis.
///
/// Scans the covered tiles row by row, skipping empty, fluid and unknown cells.
/// Spikes apply `hazard_launch` to the vertical velocity (when given) and the
/// scan continues. The first blocking tile snaps the body's leading edge to the
/// tile boundary, zeroes velocity on that axis and ends the pass. Landing on a
/// tile while falling sets `grounded`.
pub fn resolve(body: &mut Body, axis: Axis, grid: &Grid, hazard_launch: Option<f32>) -> Resolution {
    let mut result = Resolution::default();

    for (tx, ty) in body.aabb().intersecting_tiles() {
        let info = grid.info(tx, ty);
        if !info.solid {
            continue;
        }

        if info.hazard == crate::block_registry::Hazard::Spike {
            if let Some(launch) = hazard_launch {
                body.vy = launch;
                result.hazard = true;
            }
            continue;
        }

        if !info.blocks_movement() {
            continue;
        }

        match axis {
            Axis::Horizontal => {
                if body.vx > 0.0 {
                    body.x = tx as f32 * TILE_SIZE - body.width;
                } else if body.vx < 0.0 {
                    body.x = (tx + 1) as f32 * TILE_SIZE;
                }
                body.vx = 0.0;
            }
            Axis::Vertical => {
                if body.vy > 0.0 {
                    body.y = ty as f32 * TILE_SIZE - body.height;
                    body.grounded = true;
                    body.vy = 0.0;
                } else if body.vy < 0.0 {
                    body.y = (ty + 1) as f32 * TILE_SIZE;
                    body.vy = 0.0;
                }
            }
        }
        result.blocked_by = Some((tx, ty));
        return result;
    }

    result
}

/// Integrate one tick of motion: move and resolve x, then clear `grounded`,
/// move and resolve y.
pub fn step_body(body: &mut Body, grid: &Grid, hazard_launch: Option<f32>) -> (Resolution, Resolution) {
    body.x += body.vx;
    let horizontal = resolve(body, Axis::Horizontal, grid, hazard_launch);
    body.y += body.vy;
    body.grounded = false;
    let vertical = resolve(body, Axis::Vertical, grid, hazard_launch);
    (horizontal, vertical)
}

/// A sampled tile and its registry entry.
#[derive(Debug, Clone, Copy)]
pub struct TileSample {
    pub x: i32,
    pub y: i32,
    pub info: &'static BlockInfo,
}

/// The tile containing the body's center (submersion and hazard checks).
pub fn sample_center(body: &Body, grid: &Grid) -> TileSample {
    let (cx, cy) = body.center();
    let (x, y) = (tile_of(cx), tile_of(cy));
    TileSample {
        x,
        y,
        info: grid.info(x, y),
    }
}

/// The tile just under the body's feet (surface property checks).
pub fn sample_below(body: &Body, grid: &Grid) -> TileSample {
    let x = tile_of(body.x + body.width / 2.0);
    let y = tile_of(body.y + body.height + SURFACE_PROBE);
    TileSample {
        x,
        y,
        info: grid.info(x, y),
    }
}

/// Whether a solid, non-fluid cell sits just ahead of the body at foot level,
/// in its direction of horizontal travel.
pub fn blocked_ahead(body: &Body, grid: &Grid) -> bool {
    let probe_x = if body.vx > 0.0 {
        body.x + body.width + OBSTACLE_PROBE
    } else {
        body.x - OBSTACLE_PROBE
    };
    let probe_y = body.y + body.height - OBSTACLE_PROBE;
    grid.info(tile_of(probe_x), tile_of(probe_y)).solid
}
