use std::time::Instant;

use chunkfield_core::config::StreamConfig;
use chunkfield_core::error::ConfigError;
use chunkfield_world::World;
use glam::Vec2;

use crate::scenes::SceneConfig;

/// Timing data for a single walk, per control tick.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_us: f64,
    pub median_us: f64,
    pub p95_us: f64,
    pub max_us: f64,
}

/// Result of a single scripted walk.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WalkResult {
    pub scene_name: String,
    pub tick_count: u32,
    pub reconciles: u64,
    pub chunks_created: u64,
    pub chunks_destroyed: u64,
    pub cancelled: u64,
    pub final_loaded: usize,
    pub max_loaded: usize,
    pub max_pending: usize,
    /// Resident set equals the required set at the end of the walk.
    pub settled: bool,
    pub timings: TimingSeries,
}

impl WalkResult {
    pub fn churn(&self) -> u64 {
        self.chunks_created + self.chunks_destroyed
    }
}

/// Drives a world along scripted walks at a fixed tick rate.
pub struct WalkRunner {
    config: StreamConfig,
    tick_count: u32,
}

impl WalkRunner {
    pub fn new(config: StreamConfig, tick_count: u32) -> Self {
        Self { config, tick_count }
    }

    /// Run one scene for `tick_count` ticks. The observer stops at the last
    /// waypoint and the remaining ticks let deferred queues drain.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<WalkResult, ConfigError> {
        log::info!(
            "Running scene '{}' ({} topology, {} mode)...",
            scene.name,
            scene.settings.topology.label(),
            scene.settings.mode.label()
        );

        let config = StreamConfig {
            settings: scene.settings,
            ..self.config.clone()
        };
        let speed = config.observer_speed;
        let mut world = World::new(config, Vec2::from(scene.start))?;

        let mut waypoints = scene.waypoints.iter().map(|&p| Vec2::from(p));
        let mut target = waypoints.next();
        let mut max_loaded = world.loaded_count();
        let mut max_pending = 0usize;
        let mut tick_times = Vec::with_capacity(self.tick_count as usize);

        for _ in 0..self.tick_count {
            let tick_start = Instant::now();

            if let Some(goal) = target {
                let to_goal = goal - world.observer().pos;
                let dist = to_goal.length();
                if dist <= speed {
                    world.on_observer_moved(goal);
                    target = waypoints.next();
                } else {
                    world.move_observer(to_goal / dist * speed);
                }
            }
            world.on_tick();

            tick_times.push(tick_start.elapsed().as_secs_f64() * 1_000_000.0);

            let queues = world.queue_summary();
            max_loaded = max_loaded.max(world.loaded_count());
            max_pending = max_pending.max(queues.pending_loads + queues.pending_unloads);
        }

        let stats = *world.stats();
        let settled = world.chunk_map().coords() == world.required();
        if target.is_some() {
            log::warn!(
                "Scene '{}' ran out of ticks before reaching its last waypoint",
                scene.name
            );
        }
        log::debug!("Final status for '{}':\n{}", scene.name, world.status());

        let timings = compute_timings(&tick_times);
        log::info!(
            "  Done: churn={}, cancelled={}, settled={}, mean={:.2}us",
            stats.churn(),
            stats.cancelled_loads + stats.cancelled_unloads,
            settled,
            timings.mean_us
        );

        Ok(WalkResult {
            scene_name: scene.name.to_string(),
            tick_count: self.tick_count,
            reconciles: stats.reconciles,
            chunks_created: stats.chunks_created,
            chunks_destroyed: stats.chunks_destroyed,
            cancelled: stats.cancelled_loads + stats.cancelled_unloads,
            final_loaded: world.loaded_count(),
            max_loaded,
            max_pending,
            settled,
            timings,
        })
    }
}

/// Compute timing statistics from a list of tick times in microseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_us: 0.0,
            median_us: 0.0,
            p95_us: 0.0,
            max_us: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;

    TimingSeries {
        mean_us: mean,
        median_us: median,
        p95_us: sorted[p95_idx.min(n - 1)],
        max_us: sorted[n - 1],
    }
}
