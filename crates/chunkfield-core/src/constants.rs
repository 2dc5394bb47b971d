//! Single source of truth for shared constants.

/// Default side length of a chunk in world units.
pub const CHUNK_SIZE: f32 = 100.0;

/// Default upper bound for the configurable padding ring count.
pub const MAX_PADDING: u32 = 4;

/// Largest `max_padding` a config may request. A region at this padding
/// holds 131^2 cells.
pub const PADDING_CEILING: u32 = 64;

/// Default number of control ticks between deferred operations.
pub const DEFAULT_TICK_INTERVAL: u32 = 30;

/// Default observer movement per control tick, in world units.
pub const OBSERVER_SPEED: f32 = 4.0;

/// Slack added to the offset-topology radius before squaring.
/// Trims the farthest corner cells of each ring; changing it changes
/// which cells are admitted at every padding level.
pub const OFFSET_RADIUS_SLACK: f64 = 0.35;

/// Number of hex digits in a chunk content identifier.
pub const HASH_ID_LEN: usize = 8;
