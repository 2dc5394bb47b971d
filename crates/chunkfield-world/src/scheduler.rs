use crate::chunk_map::ChunkMap;
use crate::streaming::PendingQueues;
use chunkfield_core::types::ChunkCoord;

/// One deferred operation applied by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedOp {
    Unloaded(ChunkCoord),
    Loaded(ChunkCoord),
    /// Queue entry consumed without changing the registry (already absent
    /// for an unload, already resident for a load).
    Stale(ChunkCoord),
}

impl AppliedOp {
    pub fn coord(&self) -> ChunkCoord {
        match *self {
            AppliedOp::Unloaded(c) | AppliedOp::Loaded(c) | AppliedOp::Stale(c) => c,
        }
    }
}

/// Fixed-cadence drain of the pending queues: one operation every `interval` ticks.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    counter: u32,
    interval: u32,
}

impl TickScheduler {
    pub fn new(interval: u32) -> Self {
        Self {
            counter: 0,
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Ticks elapsed since the last fire.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Change the cadence. An in-progress count carries over; if it already
    /// meets the new interval the next tick fires.
    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.max(1);
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Advance by one tick. Returns true when an operation is due.
    /// Fires at most once per call, so there are no catch-up bursts.
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Advance one tick and, if due, apply the next pending operation.
    pub fn tick(
        &mut self,
        chunk_map: &mut ChunkMap,
        queues: &mut PendingQueues,
    ) -> Option<AppliedOp> {
        if self.advance() {
            apply_next(chunk_map, queues)
        } else {
            None
        }
    }
}

/// Apply exactly one pending operation, unloads before loads.
/// Unloading an absent coord or loading a resident one consumes the queue
/// entry and reports it as `Stale`.
pub fn apply_next(chunk_map: &mut ChunkMap, queues: &mut PendingQueues) -> Option<AppliedOp> {
    if let Some(coord) = queues.unloads.pop() {
        return Some(if chunk_map.unload_chunk(&coord) {
            AppliedOp::Unloaded(coord)
        } else {
            AppliedOp::Stale(coord)
        });
    }
    if let Some(coord) = queues.loads.pop() {
        return Some(if chunk_map.load_chunk(coord) {
            AppliedOp::Loaded(coord)
        } else {
            AppliedOp::Stale(coord)
        });
    }
    None
}
