use chunkfield_core::math::hash_id;
use chunkfield_core::types::ChunkCoord;

/// One resident cell of the grid. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    pub coord: ChunkCoord,
    /// Content identifier derived from `coord` only.
    pub hash_id: String,
}

impl Chunk {
    /// Build the chunk for a coordinate. Pure: equal coordinates yield equal chunks.
    pub fn create(coord: ChunkCoord) -> Self {
        Self {
            coord,
            hash_id: hash_id(coord),
        }
    }

    pub fn x(&self) -> i32 {
        self.coord.x
    }

    pub fn y(&self) -> i32 {
        self.coord.y
    }
}
