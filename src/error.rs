//! crate‑wide error type

use thiserror::Error;

/// Everything the world core can fail with.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A cell access outside `[0,W)×[0,H)`. Caller contract violation.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// Generation parameters that can never produce a valid world.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A persisted layer referenced a block id that does not exist.
    #[error("unknown block id {0}")]
    UnknownBlockId(u16),

    /// Layer or config size does not match the grid it is applied to.
    #[error("expected {}x{}, found {}x{}", expected.0, expected.1, found.0, found.1)]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;

/// shorthand used by every `validate()`
pub(crate) fn invalid(msg: impl Into<String>) -> WorldError {
    WorldError::InvalidConfiguration(msg.into())
}
