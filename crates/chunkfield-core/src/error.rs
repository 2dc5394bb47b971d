use thiserror::Error;

/// Errors that can occur while loading a chunkfield configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config RON: {0}")]
    ParseError(String),

    #[error("cell_size must be finite and positive, got {0}")]
    InvalidCellSize(f32),

    #[error("max_padding {0} exceeds the supported ceiling of {1}")]
    InvalidMaxPadding(u32, u32),
}
