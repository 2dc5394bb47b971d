use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Chunk coordinate in chunk-space (each unit = one cell of `cell_size` world units).
pub type ChunkCoord = IVec2;

/// Continuous position in world-space.
pub type WorldPos = Vec2;

/// Packing rule of the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Topology {
    /// Axis-aligned rows and columns.
    #[default]
    Square,
    /// Odd rows shifted right by half a cell.
    Offset,
}

/// How diffs between the required and resident sets are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadMode {
    /// Loads and unloads are applied as soon as the diff is computed.
    #[default]
    Immediate,
    /// Loads and unloads go through FIFO queues drained one per tick interval.
    Deferred,
}

impl Topology {
    pub fn label(self) -> &'static str {
        match self {
            Topology::Square => "square",
            Topology::Offset => "offset",
        }
    }
}

impl LoadMode {
    pub fn label(self) -> &'static str {
        match self {
            LoadMode::Immediate => "immediate",
            LoadMode::Deferred => "deferred",
        }
    }
}

/// True if the row index is odd (works for negative rows too).
#[inline]
pub fn is_odd_row(y: i32) -> bool {
    y.rem_euclid(2) == 1
}
