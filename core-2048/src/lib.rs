//! Board engine for the 2048 sliding tile puzzle.
//!
//! [`BoardEngine`] owns the grid, applies moves, spawns tiles and tracks whether the game has been
//! won or lost. It performs no I/O; a front end feeds it directions and renders [`Grid`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod grid;
pub mod spawn;

pub use config::EngineConfig;
pub use direction::Direction;
pub use engine::{BoardEngine, GameStatus, MoveResult};
pub use error::{ConfigError, GridError};
pub use grid::{Grid, Position};
pub use spawn::SpawnPolicy;
