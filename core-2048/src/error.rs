/// Errors raised when an engine is configured with values it cannot play with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be at least {min}, got {size}")]
    SizeTooSmall { size: usize, min: usize },

    #[error("grid size must be at most {max}, got {size}")]
    SizeTooLarge { size: usize, max: usize },

    #[error("target tile must be positive")]
    ZeroTarget,

    #[error("target tile must be at most {max}, got {target}")]
    TargetTooLarge { target: u64, max: u64 },

    #[error("chance of spawning a 4 must be within [0, 1], got {0}")]
    FourProbability(f64),

    #[error("grid is {actual}x{actual} but the config expects {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors raised when building a grid from explicit cell values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid must have at least 2 rows, got {0}")]
    TooSmall(usize),

    #[error("grid must have at most 64 rows, got {0}")]
    TooLarge(usize),

    #[error("row {row} has {len} cells, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("cell ({row}, {col}) holds {value}, which is not a tile value")]
    InvalidTile { row: usize, col: usize, value: u64 },
}
