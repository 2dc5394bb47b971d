use crate::constants::{
    CHUNK_SIZE, DEFAULT_TICK_INTERVAL, MAX_PADDING, OBSERVER_SPEED, PADDING_CEILING,
};
use crate::error::ConfigError;
use crate::types::{LoadMode, Topology};
use serde::{Deserialize, Serialize};

/// Runtime-tunable streaming settings, passed to `World::configure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    pub topology: Topology,
    /// Extra rings beyond the 1-cell neighborhood. Clamped to `max_padding`.
    pub padding: u32,
    /// Control ticks between deferred operations. Clamped to at least 1.
    pub interval: u32,
    pub mode: LoadMode,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            topology: Topology::Square,
            padding: 0,
            interval: DEFAULT_TICK_INTERVAL,
            mode: LoadMode::Immediate,
        }
    }
}

impl StreamSettings {
    /// Clamp padding to `[0, max_padding]` and interval to `>= 1`.
    pub fn clamped(self, max_padding: u32) -> Self {
        let padding = self.padding.min(max_padding);
        let interval = self.interval.max(1);
        if padding != self.padding {
            log::warn!(
                "padding {} exceeds maximum {}, clamped",
                self.padding,
                max_padding
            );
        }
        if interval != self.interval {
            log::warn!("interval {} below 1, clamped", self.interval);
        }
        Self {
            padding,
            interval,
            ..self
        }
    }

    /// Radius of the required region in cells (`padding + 1`).
    pub fn radius(&self) -> i32 {
        self.padding.min(PADDING_CEILING) as i32 + 1
    }
}

/// Full configuration of a chunkfield world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Side length of one cell in world units.
    pub cell_size: f32,
    pub max_padding: u32,
    /// Observer movement per control tick, in world units.
    pub observer_speed: f32,
    pub settings: StreamSettings,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            cell_size: CHUNK_SIZE,
            max_padding: MAX_PADDING,
            observer_speed: OBSERVER_SPEED,
            settings: StreamSettings::default(),
        }
    }
}

impl StreamConfig {
    /// Check invariants that clamping cannot repair and clamp the rest.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if self.max_padding > PADDING_CEILING {
            return Err(ConfigError::InvalidMaxPadding(
                self.max_padding,
                PADDING_CEILING,
            ));
        }
        let settings = self.settings.clamped(self.max_padding);
        Ok(Self { settings, ..self })
    }
}

/// Parse a RON string into a validated StreamConfig.
pub fn load_config_from_str(ron_str: &str) -> Result<StreamConfig, ConfigError> {
    let options = ron::Options::default();
    let config: StreamConfig = options
        .from_str(ron_str)
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validated()
}
