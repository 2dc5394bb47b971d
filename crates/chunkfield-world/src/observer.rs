use chunkfield_core::math::cell_of;
use chunkfield_core::types::{ChunkCoord, Topology, WorldPos};
use glam::Vec2;

/// The entity whose position drives region selection.
/// Its cell is always derived from the position, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub pos: WorldPos,
}

impl Observer {
    pub fn new(pos: WorldPos) -> Self {
        Self { pos }
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    pub fn cell(&self, topology: Topology, cell_size: f32) -> ChunkCoord {
        cell_of(self.pos, topology, cell_size)
    }
}
