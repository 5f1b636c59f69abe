use log::{debug, info, trace};
use rand::Rng;

use crate::{
    config::EngineConfig,
    direction::Direction,
    error::ConfigError,
    grid::{Grid, Position},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != Self::InProgress
    }
}

/// Outcome of a single move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub changed: bool,
    pub score_delta: u64,
    pub status: GameStatus,
    /// The cell that received a new tile, if the move was effective.
    pub spawned: Option<Position>,
}

/// Owns a game of 2048: the grid, the running score and whether the game has ended.
///
/// Randomness comes from the injected `rng`, so a seeded generator replays a game exactly.
pub struct BoardEngine<R> {
    grid: Grid,
    score: u64,
    status: GameStatus,
    config: EngineConfig,
    rng: R,
}

impl<R> BoardEngine<R>
where
    R: Rng,
{
    pub fn new(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self {
            grid: Grid::new(config.size),
            score: 0,
            status: GameStatus::InProgress,
            config,
            rng,
        };

        engine.restart();

        Ok(engine)
    }

    /// Starts from an existing grid instead of two random tiles. The score starts at zero.
    pub fn with_grid(grid: Grid, config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        if grid.size() != config.size {
            return Err(ConfigError::SizeMismatch {
                expected: config.size,
                actual: grid.size(),
            });
        }

        let mut engine = Self {
            grid,
            score: 0,
            status: GameStatus::InProgress,
            config,
            rng,
        };
        engine.status = engine.compute_status();

        Ok(engine)
    }

    /// Replaces the configuration and starts a fresh game with it. On error the current game is
    /// left as it was.
    pub fn initialize(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;

        self.config = config;
        self.restart();

        Ok(())
    }

    pub fn restart(&mut self) {
        self.grid = Grid::new(self.config.size);
        self.score = 0;

        self.spawn();
        self.spawn();

        self.status = self.compute_status();

        info!(
            "new {0}x{0} game, target {1}, status {2:?}",
            self.config.size, self.config.target, self.status
        );
    }

    /// Slides every line towards `direction`.
    ///
    /// A move that changes nothing, or any move once the game is over, leaves the engine
    /// untouched and reports `changed: false`.
    pub fn make_move(&mut self, direction: Direction) -> MoveResult {
        let unchanged = MoveResult {
            changed: false,
            score_delta: 0,
            status: self.status,
            spawned: None,
        };

        if self.status.is_terminal() {
            trace!("ignoring {direction:?}, game is {:?}", self.status);
            return unchanged;
        }

        let Some(score_delta) = self.grid.shift(direction) else {
            trace!("{direction:?} is a no-op");
            return unchanged;
        };

        self.score = self.score.saturating_add(score_delta);
        let spawned = self.spawn();
        self.status = self.compute_status();

        debug!("{direction:?}: +{score_delta} (score {}), spawned at {spawned:?}", self.score);

        if self.status.is_terminal() {
            info!(
                "game {:?} with score {} and highest tile {}",
                self.status,
                self.score,
                self.grid.highest_tile()
            );
        }

        MoveResult {
            changed: true,
            score_delta,
            status: self.status,
            spawned,
        }
    }

    fn spawn(&mut self) -> Option<Position> {
        self.config.spawn.spawn(&mut self.grid, &mut self.rng)
    }
}

impl<R> BoardEngine<R> {
    /// `Won` takes precedence over `Lost`. A game is lost only when none of the four moves would
    /// change the grid.
    fn compute_status(&self) -> GameStatus {
        if self.grid.highest_tile() >= self.config.target {
            GameStatus::Won
        } else if Direction::iter().any(|direction| self.grid.can_move(direction)) {
            GameStatus::InProgress
        } else {
            GameStatus::Lost
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn highest_tile(&self) -> u64 {
        self.grid.highest_tile()
    }

    /// Moves that would currently change the grid, in `Direction::ALL` order. All `false` once
    /// the game is over.
    pub fn legal_moves(&self) -> [bool; 4] {
        if self.status.is_terminal() {
            [false; 4]
        } else {
            self.grid.legal_moves()
        }
    }
}
