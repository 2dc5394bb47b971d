use crate::chunk::Chunk;
use chunkfield_core::types::ChunkCoord;
use std::collections::{HashMap, HashSet};

/// Registry of resident chunks, keyed by coordinate.
/// Holds at most one chunk per coordinate; iteration order is unspecified.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self {
            chunks: HashMap::new(),
        }
    }

    /// Create and insert the chunk at `coord` if it is absent.
    /// Returns false (and leaves the existing chunk untouched) if already resident.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        let chunk = Chunk::create(coord);
        log::debug!(
            "[LOAD] chunk ({},{}) created with hash {}",
            coord.x,
            coord.y,
            chunk.hash_id
        );
        self.chunks.insert(coord, chunk);
        true
    }

    /// Destroy the chunk at `coord`. Returns false if nothing was resident.
    pub fn unload_chunk(&mut self, coord: &ChunkCoord) -> bool {
        match self.chunks.remove(coord) {
            Some(_) => {
                log::debug!("[UNLOAD] chunk ({},{}) destroyed", coord.x, coord.y);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Get a chunk by coordinate.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    /// Iterator over all resident chunks, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Snapshot of the resident coordinates.
    pub fn coords(&self) -> HashSet<ChunkCoord> {
        self.chunks.keys().copied().collect()
    }

    /// Number of resident chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
