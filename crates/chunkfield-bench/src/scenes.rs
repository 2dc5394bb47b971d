use chunkfield_core::config::StreamSettings;
use chunkfield_core::types::{LoadMode, Topology};

/// A scripted observer walk.
pub struct SceneConfig {
    pub name: &'static str,
    pub settings: StreamSettings,
    /// Observer start position in world units.
    pub start: [f32; 2],
    /// Points visited in order at the configured observer speed.
    pub waypoints: Vec<[f32; 2]>,
}

/// Return the standard suite of walks, covering both topologies and both modes.
/// Positions are expressed in cells of `cell_size` world units.
pub fn standard_scenes(cell_size: f32) -> Vec<SceneConfig> {
    let cs = cell_size;
    let mid = cs / 2.0;

    vec![
        SceneConfig {
            name: "square-line",
            settings: StreamSettings::default(),
            start: [mid, mid],
            waypoints: vec![[mid + 10.0 * cs, mid]],
        },
        SceneConfig {
            name: "square-zigzag-deferred",
            settings: StreamSettings {
                mode: LoadMode::Deferred,
                interval: 5,
                ..StreamSettings::default()
            },
            start: [mid, mid],
            waypoints: vec![
                [mid + 1.5 * cs, mid],
                [mid - 0.5 * cs, mid],
                [mid + 1.5 * cs, mid],
                [mid, mid],
            ],
        },
        SceneConfig {
            name: "offset-loop",
            settings: StreamSettings {
                topology: Topology::Offset,
                padding: 1,
                ..StreamSettings::default()
            },
            start: [mid, mid],
            waypoints: vec![
                [mid + 4.0 * cs, mid],
                [mid + 4.0 * cs, mid + 4.0 * cs],
                [mid, mid + 4.0 * cs],
                [mid, mid],
            ],
        },
        SceneConfig {
            name: "offset-diagonal-deferred",
            settings: StreamSettings {
                topology: Topology::Offset,
                padding: 2,
                mode: LoadMode::Deferred,
                interval: 2,
            },
            start: [mid, mid],
            waypoints: vec![[mid + 6.0 * cs, mid + 6.0 * cs]],
        },
    ]
}
