pub mod chunk;
pub mod chunk_map;
pub mod observer;
pub mod region;
pub mod scheduler;
pub mod status;
pub mod streaming;

use chunk::Chunk;
use chunk_map::ChunkMap;
use chunkfield_core::config::{StreamConfig, StreamSettings};
use chunkfield_core::error::ConfigError;
use chunkfield_core::types::{ChunkCoord, LoadMode, WorldPos};
use glam::Vec2;
use observer::Observer;
use scheduler::{AppliedOp, TickScheduler};
use status::{StreamStats, WorldStatus};
use std::collections::HashSet;
use streaming::{PendingQueues, QueueSummary, ReconcileReport};

/// Primary public struct for the chunkfield-world crate.
/// Owns the chunk registry and pending queues, and keeps them in step with
/// the observer's position.
pub struct World {
    cell_size: f32,
    max_padding: u32,
    settings: StreamSettings,
    observer: Observer,
    /// Last known observer cell, for change detection only.
    last_cell: ChunkCoord,
    chunk_map: ChunkMap,
    queues: PendingQueues,
    scheduler: TickScheduler,
    stats: StreamStats,
}

impl World {
    /// Create a world with the observer at `start` and run the initial reconcile.
    pub fn new(config: StreamConfig, start: WorldPos) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let settings = config.settings;
        let observer = Observer::new(start);
        let last_cell = observer.cell(settings.topology, config.cell_size);

        let mut world = Self {
            cell_size: config.cell_size,
            max_padding: config.max_padding,
            settings,
            observer,
            last_cell,
            chunk_map: ChunkMap::new(),
            queues: PendingQueues::new(),
            scheduler: TickScheduler::new(settings.interval),
            stats: StreamStats::default(),
        };
        world.reconcile(settings.mode);
        log::info!(
            "World initialized at cell ({}, {}): {} topology, padding {}, {} mode",
            last_cell.x,
            last_cell.y,
            settings.topology.label(),
            settings.padding,
            settings.mode.label()
        );
        Ok(world)
    }

    /// Apply new settings. Padding is clamped to `[0, max_padding]` and the
    /// interval to at least 1. Switching from deferred to immediate flushes
    /// against the current required set.
    pub fn configure(&mut self, settings: StreamSettings) -> Option<ReconcileReport> {
        let new = settings.clamped(self.max_padding);
        let old = self.settings;
        if new == old {
            return None;
        }
        self.settings = new;

        if new.interval != old.interval {
            self.scheduler.set_interval(new.interval);
        }
        if new.mode == LoadMode::Deferred && old.mode != LoadMode::Deferred {
            self.scheduler.reset();
        }
        if new.topology != old.topology {
            self.last_cell = self.observer.cell(new.topology, self.cell_size);
        }

        let flush = old.mode == LoadMode::Deferred && new.mode == LoadMode::Immediate;
        let shape_changed = new.topology != old.topology || new.padding != old.padding;
        if !flush && !shape_changed {
            return None;
        }
        if flush {
            log::info!(
                "Flushing {} pending loads and {} pending unloads",
                self.queues.loads.len(),
                self.queues.unloads.len()
            );
        }
        Some(self.reconcile(new.mode))
    }

    /// Move the observer to `pos`. Reconciles only if the observer's cell changed.
    pub fn on_observer_moved(&mut self, pos: WorldPos) -> Option<ReconcileReport> {
        self.observer.pos = pos;
        let cell = self.observer.cell(self.settings.topology, self.cell_size);
        if cell == self.last_cell {
            return None;
        }
        log::debug!(
            "Observer entered cell ({}, {}) from ({}, {})",
            cell.x,
            cell.y,
            self.last_cell.x,
            self.last_cell.y
        );
        self.last_cell = cell;
        Some(self.reconcile(self.settings.mode))
    }

    /// Move the observer by `delta` world units.
    pub fn move_observer(&mut self, delta: Vec2) -> Option<ReconcileReport> {
        self.on_observer_moved(self.observer.pos + delta)
    }

    /// Advance the deferred scheduler by one control tick. No-op in immediate mode.
    pub fn on_tick(&mut self) -> Option<AppliedOp> {
        if self.settings.mode != LoadMode::Deferred {
            return None;
        }
        let op = self.scheduler.tick(&mut self.chunk_map, &mut self.queues)?;
        self.stats.record_applied(&op);
        Some(op)
    }

    fn reconcile(&mut self, mode: LoadMode) -> ReconcileReport {
        let required = self.required();
        let report = streaming::reconcile(&mut self.chunk_map, &mut self.queues, &required, mode);
        self.stats.record_reconcile(&report);
        report
    }

    /// Cells that should be resident for the observer's current cell.
    pub fn required(&self) -> HashSet<ChunkCoord> {
        region::required_cells(self.last_cell, self.settings.topology, self.settings.padding)
    }

    /// Resident chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunk_map.iter()
    }

    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    /// Coordinates awaiting load, oldest first.
    pub fn pending_loads(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.queues.loads.iter()
    }

    /// Coordinates awaiting unload, oldest first.
    pub fn pending_unloads(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.queues.unloads.iter()
    }

    pub fn is_pending_load(&self, coord: &ChunkCoord) -> bool {
        self.queues.loads.contains(coord)
    }

    pub fn is_pending_unload(&self, coord: &ChunkCoord) -> bool {
        self.queues.unloads.contains(coord)
    }

    pub fn queue_summary(&self) -> QueueSummary {
        self.queues.summary()
    }

    pub fn current_cell(&self) -> ChunkCoord {
        self.last_cell
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn settings(&self) -> StreamSettings {
        self.settings
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Number of resident chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunk_map.loaded_count()
    }

    pub fn status(&self) -> WorldStatus {
        WorldStatus {
            observer_pos: self.observer.pos,
            current_cell: self.last_cell,
            loaded: self.loaded_count(),
            queues: self.queue_summary(),
            settings: self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkfield_core::types::Topology;
    use glam::IVec2;

    const CS: f32 = 100.0;

    fn config(settings: StreamSettings) -> StreamConfig {
        StreamConfig {
            settings,
            ..StreamConfig::default()
        }
    }

    fn deferred(interval: u32) -> StreamSettings {
        StreamSettings {
            mode: LoadMode::Deferred,
            interval,
            ..StreamSettings::default()
        }
    }

    fn center_of(x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32 * CS + CS * 0.5, y as f32 * CS + CS * 0.5)
    }

    fn world_at(x: i32, y: i32) -> World {
        World::new(StreamConfig::default(), center_of(x, y)).expect("valid config")
    }

    #[test]
    fn test_initial_load_square() {
        let world = world_at(0, 0);
        assert_eq!(world.current_cell(), IVec2::ZERO);
        assert_eq!(world.loaded_count(), 9);
        assert_eq!(world.chunk_map().coords(), world.required());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = StreamConfig {
            cell_size: f32::NAN,
            ..StreamConfig::default()
        };
        assert!(World::new(bad, Vec2::ZERO).is_err());
    }

    #[test]
    fn test_move_within_cell_does_nothing() {
        let mut world = world_at(0, 0);
        assert!(world.move_observer(Vec2::new(4.0, 4.0)).is_none());
        assert!(world.on_observer_moved(Vec2::new(99.0, 1.0)).is_none());
        assert_eq!(world.stats().reconciles, 1);
    }

    #[test]
    fn test_step_into_next_cell_swaps_column() {
        let mut world = world_at(0, 0);
        let report = world
            .on_observer_moved(center_of(1, 0))
            .expect("cell changed");
        assert_eq!(report.unloaded, 3);
        assert_eq!(report.loaded, 3);
        assert_eq!(world.loaded_count(), 9);
        for y in -1..=1 {
            assert!(!world.chunk_map().contains(&IVec2::new(-1, y)));
            assert!(world.chunk_map().contains(&IVec2::new(2, y)));
        }
    }

    #[test]
    fn test_on_tick_noop_in_immediate_mode() {
        let mut world = world_at(0, 0);
        world.on_observer_moved(center_of(3, 3));
        for _ in 0..100 {
            assert!(world.on_tick().is_none());
        }
        assert_eq!(world.queue_summary(), QueueSummary::default());
    }

    #[test]
    fn test_deferred_rate_limited() {
        let mut world = World::new(config(deferred(5)), center_of(0, 0)).expect("valid config");
        assert_eq!(world.loaded_count(), 0);
        assert_eq!(world.queue_summary().pending_loads, 9);

        let mut applied = 0;
        for tick in 1..=45 {
            if world.on_tick().is_some() {
                applied += 1;
                assert_eq!(tick % 5, 0);
            }
        }
        assert_eq!(applied, 9);
        assert_eq!(world.loaded_count(), 9);
        assert_eq!(world.chunk_map().coords(), world.required());
    }

    #[test]
    fn test_deferred_unloads_first() {
        let mut world = world_at(0, 0);
        world.configure(deferred(1));
        world.on_observer_moved(center_of(1, 0));
        assert!(world.is_pending_unload(&IVec2::new(-1, 0)));
        assert!(world.is_pending_load(&IVec2::new(2, 0)));

        for _ in 0..3 {
            assert!(matches!(world.on_tick(), Some(AppliedOp::Unloaded(_))));
        }
        for _ in 0..3 {
            assert!(matches!(world.on_tick(), Some(AppliedOp::Loaded(_))));
        }
        assert!(world.on_tick().is_none());
        assert_eq!(world.chunk_map().coords(), world.required());
    }

    #[test]
    fn test_deferred_turn_back_cancels() {
        let mut world = world_at(0, 0);
        world.configure(deferred(10));
        world.on_observer_moved(center_of(1, 0));
        assert!(world.is_pending_load(&IVec2::new(2, 0)));

        world.on_observer_moved(center_of(0, 0));
        assert!(!world.is_pending_load(&IVec2::new(2, 0)));
        assert_eq!(world.queue_summary(), QueueSummary::default());
        assert_eq!(world.stats().cancelled_loads, 3);
        assert_eq!(world.stats().cancelled_unloads, 3);
    }

    #[test]
    fn test_switch_to_immediate_flushes_current_required() {
        let mut world = world_at(0, 0);
        world.configure(deferred(100));
        world.on_observer_moved(center_of(1, 0));
        world.on_observer_moved(center_of(1, 1));
        assert!(world.queue_summary().pending_loads > 0);

        let report = world
            .configure(StreamSettings {
                mode: LoadMode::Immediate,
                ..world.settings()
            })
            .expect("flush reconcile");
        assert!(report.abandoned > 0);
        assert_eq!(world.queue_summary(), QueueSummary::default());
        assert_eq!(
            world.chunk_map().coords(),
            region::required_cells(IVec2::new(1, 1), Topology::Square, 0)
        );
    }

    #[test]
    fn test_configure_padding_clamped_and_reloads() {
        let mut world = world_at(0, 0);
        world.configure(StreamSettings {
            padding: 99,
            ..world.settings()
        });
        assert_eq!(world.settings().padding, StreamConfig::default().max_padding);
        assert_eq!(
            world.loaded_count(),
            region::square_region_len(StreamConfig::default().max_padding)
        );
    }

    #[test]
    fn test_configure_interval_clamped() {
        let mut world = world_at(0, 0);
        world.configure(StreamSettings {
            interval: 0,
            ..world.settings()
        });
        assert_eq!(world.settings().interval, 1);
    }

    #[test]
    fn test_configure_topology_recomputes_cell() {
        // Left half of an odd row belongs to column -1 in the offset layout.
        let start = Vec2::new(20.0, 150.0);
        let mut world = World::new(StreamConfig::default(), start).expect("valid config");
        assert_eq!(world.current_cell(), IVec2::new(0, 1));
        world.configure(StreamSettings {
            topology: Topology::Offset,
            ..world.settings()
        });
        assert_eq!(world.current_cell(), IVec2::new(-1, 1));
        assert_eq!(world.loaded_count(), 7);
        assert_eq!(world.chunk_map().coords(), world.required());
    }

    #[test]
    fn test_configure_same_settings_is_noop() {
        let mut world = world_at(0, 0);
        assert!(world.configure(world.settings()).is_none());
    }

    #[test]
    fn test_far_away_observer_is_total() {
        let mut world = world_at(0, 0);
        let report = world
            .on_observer_moved(Vec2::new(3.0e11, 50.0))
            .expect("cell changed");
        assert_eq!(world.current_cell(), IVec2::new(i32::MAX, 0));
        assert!(report.loaded > 0);
        assert!(world.chunk_map().contains(&world.current_cell()));
        assert_eq!(world.chunk_map().coords(), world.required());

        world.configure(StreamSettings {
            topology: Topology::Offset,
            padding: 2,
            ..world.settings()
        });
        assert_eq!(world.chunk_map().coords(), world.required());
        world.on_observer_moved(Vec2::new(-3.0e11, -3.0e11));
        assert_eq!(world.current_cell(), IVec2::new(i32::MIN, i32::MIN));
        assert_eq!(world.chunk_map().coords(), world.required());
    }

    #[test]
    fn test_status_reports_world() {
        let world = world_at(2, -1);
        let status = world.status();
        assert_eq!(status.current_cell, IVec2::new(2, -1));
        assert_eq!(status.loaded, 9);
    }
}
