use crate::constants::HASH_ID_LEN;
use crate::types::{is_odd_row, ChunkCoord, Topology, WorldPos};
use glam::{IVec2, Vec2};

/// Convert a world-space position to the coordinate of the cell containing it.
///
/// In the offset topology odd rows are drawn shifted right by half a cell, so
/// the x input is shifted left by the same amount before flooring.
pub fn cell_of(pos: WorldPos, topology: Topology, cell_size: f32) -> ChunkCoord {
    let cy = (pos.y / cell_size).floor() as i32;
    let x = match topology {
        Topology::Offset if is_odd_row(cy) => pos.x - cell_size * 0.5,
        _ => pos.x,
    };
    let cx = (x / cell_size).floor() as i32;
    IVec2::new(cx, cy)
}

/// World-space top-left corner of a cell. Inverse placement of [`cell_of`].
pub fn cell_origin(coord: ChunkCoord, topology: Topology, cell_size: f32) -> WorldPos {
    let shift = match topology {
        Topology::Offset if is_odd_row(coord.y) => cell_size * 0.5,
        _ => 0.0,
    };
    Vec2::new(coord.x as f32 * cell_size + shift, coord.y as f32 * cell_size)
}

/// World-space center of a cell.
pub fn cell_center(coord: ChunkCoord, topology: Topology, cell_size: f32) -> WorldPos {
    cell_origin(coord, topology, cell_size) + Vec2::splat(cell_size * 0.5)
}

/// Short content identifier for a chunk: the first `HASH_ID_LEN` lowercase hex
/// digits of the MD5 digest of `"(x,y)"`. Pure function of the coordinate.
pub fn hash_id(coord: ChunkCoord) -> String {
    let digest = md5::compute(format!("({},{})", coord.x, coord.y));
    let mut hex = format!("{:x}", digest);
    hex.truncate(HASH_ID_LEN);
    hex
}
