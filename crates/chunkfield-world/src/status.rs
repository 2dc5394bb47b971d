use crate::scheduler::AppliedOp;
use crate::streaming::{QueueSummary, ReconcileReport};
use chunkfield_core::config::StreamSettings;
use chunkfield_core::types::{ChunkCoord, LoadMode, WorldPos};
use std::fmt;

/// Lifetime counters of a world's streaming activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks_created: u64,
    pub chunks_destroyed: u64,
    pub queued_loads: u64,
    pub queued_unloads: u64,
    pub cancelled_loads: u64,
    pub cancelled_unloads: u64,
    /// Queue entries dropped by an immediate reconcile.
    pub abandoned: u64,
    pub reconciles: u64,
    /// Deferred operations applied by the scheduler, stale ones included.
    pub ops_applied: u64,
    /// Deferred operations that found the registry already in the target state.
    pub stale_ops: u64,
}

impl StreamStats {
    pub fn record_reconcile(&mut self, report: &ReconcileReport) {
        self.reconciles += 1;
        self.chunks_created += report.loaded as u64;
        self.chunks_destroyed += report.unloaded as u64;
        self.queued_loads += report.queued_loads as u64;
        self.queued_unloads += report.queued_unloads as u64;
        self.cancelled_loads += report.cancelled_loads as u64;
        self.cancelled_unloads += report.cancelled_unloads as u64;
        self.abandoned += report.abandoned as u64;
    }

    pub fn record_applied(&mut self, op: &AppliedOp) {
        self.ops_applied += 1;
        match op {
            AppliedOp::Loaded(_) => self.chunks_created += 1,
            AppliedOp::Unloaded(_) => self.chunks_destroyed += 1,
            AppliedOp::Stale(_) => self.stale_ops += 1,
        }
    }

    /// Total create + destroy actions.
    pub fn churn(&self) -> u64 {
        self.chunks_created + self.chunks_destroyed
    }
}

/// Read-only snapshot for status displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldStatus {
    pub observer_pos: WorldPos,
    pub current_cell: ChunkCoord,
    pub loaded: usize,
    pub queues: QueueSummary,
    pub settings: StreamSettings,
}

impl fmt::Display for WorldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Observer Pos: ({:.0}, {:.0})",
            self.observer_pos.x, self.observer_pos.y
        )?;
        writeln!(
            f,
            "Current Chunk: ({}, {})",
            self.current_cell.x, self.current_cell.y
        )?;
        writeln!(f, "Loaded Chunks: {}", self.loaded)?;
        writeln!(
            f,
            "Layout: {} (padding {})",
            self.settings.topology.label(),
            self.settings.padding
        )?;
        match self.settings.mode {
            LoadMode::Immediate => write!(f, "Mode: {}", self.settings.mode.label()),
            LoadMode::Deferred => write!(
                f,
                "Mode: {} (every {} ticks) | Pending: {} loads, {} unloads",
                self.settings.mode.label(),
                self.settings.interval,
                self.queues.pending_loads,
                self.queues.pending_unloads
            ),
        }
    }
}
