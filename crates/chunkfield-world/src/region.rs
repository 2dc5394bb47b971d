//! Region selection: which cells must be resident around a center cell.
//!
//! The result is a pure function of `(center, topology, padding)`. Both
//! topologies scan the same bounding square of radius `padding + 1`; the
//! offset topology additionally drops cells outside a slackened circle.
//! Cell arithmetic saturates, so centers at the edge of the i32 range yield
//! a truncated region rather than overflowing.

use chunkfield_core::constants::{OFFSET_RADIUS_SLACK, PADDING_CEILING};
use chunkfield_core::types::{is_odd_row, ChunkCoord, Topology};
use glam::IVec2;
use std::collections::HashSet;

/// Cells that must be resident for an observer in `center`.
/// Always contains `center`. `padding` is clamped to `PADDING_CEILING`.
pub fn required_cells(
    center: ChunkCoord,
    topology: Topology,
    padding: u32,
) -> HashSet<ChunkCoord> {
    let radius = padding.min(PADDING_CEILING) as i32 + 1;
    match topology {
        Topology::Square => square_region(center, radius),
        Topology::Offset => offset_region(center, radius),
    }
}

/// Expected number of cells in a square region (`(2r + 1)^2`).
pub fn square_region_len(padding: u32) -> usize {
    let side = 2 * (padding.min(PADDING_CEILING) as usize + 1) + 1;
    side * side
}

fn square_region(center: ChunkCoord, radius: i32) -> HashSet<ChunkCoord> {
    let side = (2 * radius + 1) as usize;
    let mut cells = HashSet::with_capacity(side * side);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            cells.insert(center.saturating_add(IVec2::new(dx, dy)));
        }
    }
    cells
}

fn offset_region(center: ChunkCoord, radius: i32) -> HashSet<ChunkCoord> {
    let limit = radius as f64 + OFFSET_RADIUS_SLACK;
    let limit_sq = limit * limit;
    let center_odd = is_odd_row(center.y);

    let mut cells = HashSet::new();
    for dy in -radius..=radius {
        let row_odd = is_odd_row(center.y.saturating_add(dy));
        // Half-cell shift between this row and the center row, in the
        // direction odd rows are displaced (+x).
        let shift = match (row_odd, center_odd) {
            (true, false) => 0.5,
            (false, true) => -0.5,
            _ => 0.0,
        };
        for dx in -radius..=radius {
            let eff_dx = dx as f64 + shift;
            let dist_sq = eff_dx * eff_dx + (dy * dy) as f64;
            if dist_sq <= limit_sq {
                cells.insert(center.saturating_add(IVec2::new(dx, dy)));
            }
        }
    }
    cells
}
