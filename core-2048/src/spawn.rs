use rand::Rng;

use crate::grid::{Grid, Position};

/// Where new tiles go and what value they take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPolicy {
    /// Chance that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            four_probability: 0.1,
        }
    }
}

impl SpawnPolicy {
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.four_probability)
    }

    /// Places one tile in an empty cell picked uniformly at random. Does nothing on a full grid.
    pub fn spawn(&self, grid: &mut Grid, rng: &mut impl Rng) -> Option<Position> {
        let slot_count = grid.empty_count();

        if slot_count == 0 {
            return None;
        }

        let slot_idx = rng.gen_range(0..slot_count);
        let value = if rng.gen_bool(self.four_probability) {
            4
        } else {
            2
        };

        let position = grid.empty_cells().nth(slot_idx)?;
        grid.set(position, value);

        Some(position)
    }
}
