//! Lifecycle diffing between the required set and the resident set.
//!
//! Immediate mode applies the diff before returning. Deferred mode records
//! the diff in two FIFO queues which the tick scheduler drains later; every
//! reconcile also cancels queued operations that became unnecessary.

use crate::chunk_map::ChunkMap;
use chunkfield_core::types::{ChunkCoord, LoadMode};
use std::collections::{HashSet, VecDeque};

/// FIFO queue of coordinates with a membership guard.
#[derive(Debug, Default, Clone)]
pub struct CoordQueue {
    order: VecDeque<ChunkCoord>,
    members: HashSet<ChunkCoord>,
}

impl CoordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `coord` unless it is already queued. Returns true if appended.
    pub fn push(&mut self, coord: ChunkCoord) -> bool {
        if self.members.insert(coord) {
            self.order.push_back(coord);
            true
        } else {
            false
        }
    }

    /// Remove and return the oldest entry.
    pub fn pop(&mut self) -> Option<ChunkCoord> {
        let coord = self.order.pop_front()?;
        self.members.remove(&coord);
        Some(coord)
    }

    /// Drop every entry for which `keep` returns false. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&ChunkCoord) -> bool) -> usize {
        let before = self.order.len();
        let members = &mut self.members;
        self.order.retain(|coord| {
            let kept = keep(coord);
            if !kept {
                members.remove(coord);
            }
            kept
        });
        before - self.order.len()
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.members.contains(coord)
    }

    /// Entries in enqueue order.
    pub fn iter(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

/// Pending deferred operations. A coordinate is never in both queues.
#[derive(Debug, Default, Clone)]
pub struct PendingQueues {
    pub loads: CoordQueue,
    pub unloads: CoordQueue,
}

impl PendingQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty() && self.unloads.is_empty()
    }

    pub fn clear(&mut self) {
        self.loads.clear();
        self.unloads.clear();
    }

    pub fn summary(&self) -> QueueSummary {
        QueueSummary {
            pending_loads: self.loads.len(),
            pending_unloads: self.unloads.len(),
        }
    }
}

/// Queue lengths, for status displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub pending_loads: usize,
    pub pending_unloads: usize,
}

/// What a single reconcile did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub loaded: usize,
    pub unloaded: usize,
    pub queued_loads: usize,
    pub queued_unloads: usize,
    pub cancelled_loads: usize,
    pub cancelled_unloads: usize,
    /// Queue entries dropped without being applied (immediate mode only).
    pub abandoned: usize,
}

impl ReconcileReport {
    /// True if the reconcile neither changed the registry nor the queues.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Reconcile the registry (or the queues) against `required`.
pub fn reconcile(
    chunk_map: &mut ChunkMap,
    queues: &mut PendingQueues,
    required: &HashSet<ChunkCoord>,
    mode: LoadMode,
) -> ReconcileReport {
    let resident = chunk_map.coords();
    let to_unload: Vec<ChunkCoord> = resident.difference(required).copied().collect();
    let to_load: Vec<ChunkCoord> = required.difference(&resident).copied().collect();

    match mode {
        LoadMode::Immediate => apply_immediate(chunk_map, queues, &to_unload, &to_load),
        LoadMode::Deferred => schedule_deferred(chunk_map, queues, required, &to_unload, &to_load),
    }
}

fn apply_immediate(
    chunk_map: &mut ChunkMap,
    queues: &mut PendingQueues,
    to_unload: &[ChunkCoord],
    to_load: &[ChunkCoord],
) -> ReconcileReport {
    let mut report = ReconcileReport {
        abandoned: queues.loads.len() + queues.unloads.len(),
        ..ReconcileReport::default()
    };
    queues.clear();

    for coord in to_unload {
        if chunk_map.unload_chunk(coord) {
            report.unloaded += 1;
        }
    }
    for coord in to_load {
        if chunk_map.load_chunk(*coord) {
            report.loaded += 1;
        }
    }
    report
}

fn schedule_deferred(
    chunk_map: &ChunkMap,
    queues: &mut PendingQueues,
    required: &HashSet<ChunkCoord>,
    to_unload: &[ChunkCoord],
    to_load: &[ChunkCoord],
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for coord in to_unload {
        if !queues.loads.contains(coord) && queues.unloads.push(*coord) {
            report.queued_unloads += 1;
        }
    }
    for coord in to_load {
        if chunk_map.contains(coord) || queues.unloads.contains(coord) {
            continue;
        }
        if queues.loads.push(*coord) {
            report.queued_loads += 1;
        }
    }

    // Cancellation runs unconditionally: entries queued by an earlier
    // reconcile may have been invalidated by the observer turning back.
    report.cancelled_loads = queues.loads.retain(|coord| required.contains(coord));
    report.cancelled_unloads = queues.unloads.retain(|coord| !required.contains(coord));

    debug_assert!(
        queues.loads.iter().all(|c| !queues.unloads.contains(c)),
        "coordinate present in both pending queues"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::required_cells;
    use chunkfield_core::types::Topology;
    use glam::IVec2;

    fn square(center: IVec2) -> HashSet<ChunkCoord> {
        required_cells(center, Topology::Square, 0)
    }

    #[test]
    fn test_queue_fifo_and_dedup() {
        let mut q = CoordQueue::new();
        assert!(q.push(IVec2::new(1, 0)));
        assert!(q.push(IVec2::new(2, 0)));
        assert!(!q.push(IVec2::new(1, 0)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(IVec2::new(1, 0)));
        assert!(!q.contains(&IVec2::new(1, 0)));
        assert_eq!(q.pop(), Some(IVec2::new(2, 0)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_queue_retain_updates_membership() {
        let mut q = CoordQueue::new();
        for x in 0..5 {
            q.push(IVec2::new(x, 0));
        }
        let dropped = q.retain(|c| c.x % 2 == 0);
        assert_eq!(dropped, 2);
        assert!(!q.contains(&IVec2::new(1, 0)));
        assert!(q.contains(&IVec2::new(4, 0)));
        let order: Vec<i32> = q.iter().map(|c| c.x).collect();
        assert_eq!(order, vec![0, 2, 4]);
    }

    #[test]
    fn test_immediate_resident_equals_required() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        let required = required_cells(IVec2::new(3, -4), Topology::Offset, 2);
        let report = reconcile(&mut map, &mut queues, &required, LoadMode::Immediate);
        assert_eq!(map.coords(), required);
        assert_eq!(report.loaded, required.len());
        assert_eq!(report.unloaded, 0);
    }

    #[test]
    fn test_immediate_reconcile_is_idempotent() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        let required = square(IVec2::ZERO);
        reconcile(&mut map, &mut queues, &required, LoadMode::Immediate);
        let second = reconcile(&mut map, &mut queues, &required, LoadMode::Immediate);
        assert!(second.is_noop(), "second reconcile did work: {second:?}");
    }

    #[test]
    fn test_immediate_step_right_swaps_one_column() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Immediate);

        let moved = square(IVec2::new(1, 0));
        let report = reconcile(&mut map, &mut queues, &moved, LoadMode::Immediate);
        assert_eq!(report.unloaded, 3);
        assert_eq!(report.loaded, 3);
        assert_eq!(map.loaded_count(), 9);
        for y in -1..=1 {
            assert!(!map.contains(&IVec2::new(-1, y)));
            assert!(map.contains(&IVec2::new(2, y)));
        }
    }

    #[test]
    fn test_immediate_abandons_queued_work() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Deferred);
        assert_eq!(queues.loads.len(), 9);
        assert!(map.is_empty());

        let report = reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Immediate);
        assert_eq!(report.abandoned, 9);
        assert!(queues.is_empty());
        assert_eq!(map.coords(), square(IVec2::ZERO));
    }

    #[test]
    fn test_deferred_does_not_touch_registry() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Immediate);

        let moved = square(IVec2::new(1, 0));
        let report = reconcile(&mut map, &mut queues, &moved, LoadMode::Deferred);
        assert_eq!(report.queued_unloads, 3);
        assert_eq!(report.queued_loads, 3);
        assert_eq!(map.coords(), square(IVec2::ZERO));
        assert!(queues.unloads.contains(&IVec2::new(-1, 0)));
        assert!(queues.loads.contains(&IVec2::new(2, 0)));
    }

    #[test]
    fn test_deferred_no_duplicate_entries() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        let required = square(IVec2::ZERO);
        reconcile(&mut map, &mut queues, &required, LoadMode::Deferred);
        let second = reconcile(&mut map, &mut queues, &required, LoadMode::Deferred);
        assert_eq!(second.queued_loads, 0);
        assert_eq!(queues.loads.len(), 9);
    }

    #[test]
    fn test_deferred_cancels_load_when_observer_turns_back() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Immediate);

        reconcile(&mut map, &mut queues, &square(IVec2::new(1, 0)), LoadMode::Deferred);
        let target = IVec2::new(2, 0);
        assert!(queues.loads.contains(&target));

        let report = reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Deferred);
        assert!(!queues.loads.contains(&target));
        assert_eq!(report.cancelled_loads, 3);
        assert_eq!(report.cancelled_unloads, 3);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_deferred_cancellation_runs_with_empty_diff() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        // Stale entries left behind by an earlier reconcile.
        queues.loads.push(IVec2::new(50, 50));
        queues.unloads.push(IVec2::new(0, 0));
        map.load_chunk(IVec2::new(0, 0));

        let required: HashSet<ChunkCoord> = [IVec2::new(0, 0)].into_iter().collect();
        let report = reconcile(&mut map, &mut queues, &required, LoadMode::Deferred);
        assert_eq!(report.queued_loads + report.queued_unloads, 0);
        assert_eq!(report.cancelled_loads, 1);
        assert_eq!(report.cancelled_unloads, 1);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_queues_stay_disjoint_through_zigzag() {
        let mut map = ChunkMap::new();
        let mut queues = PendingQueues::new();
        reconcile(&mut map, &mut queues, &square(IVec2::ZERO), LoadMode::Immediate);
        let path = [(1, 0), (2, 0), (1, 0), (1, 1), (0, 0), (-1, -1), (0, 0)];
        for (x, y) in path {
            let required = square(IVec2::new(x, y));
            reconcile(&mut map, &mut queues, &required, LoadMode::Deferred);
            for coord in queues.loads.iter() {
                assert!(!queues.unloads.contains(coord));
                assert!(!map.contains(coord), "resident coord {coord} queued for load");
                assert!(required.contains(coord));
            }
            for coord in queues.unloads.iter() {
                assert!(!required.contains(coord));
            }
        }
    }
}
