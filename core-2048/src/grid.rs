use std::{fmt, mem};

use crate::{direction::Direction, error::GridError};

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 64;

/// Largest tile a `u64` cell can hold. Two of these never merge.
pub const MAX_TILE: u64 = 1 << 63;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Square board of tile values stored row-major, with `0` marking an empty cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u64>,
}

const fn is_tile_value(value: u64) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Slides the tiles of `line` towards index 0 and merges equal neighbours, returning the sum of
/// the merged tiles.
///
/// A slot produced by a merge cannot merge again in the same pass, so `[2, 2, 2, 0]` becomes
/// `[4, 2, 0, 0]`.
pub fn merge_line(line: &mut [u64]) -> u64 {
    let mut len = 0;
    let mut mergeable = false;
    let mut score: u64 = 0;

    for read in 0..line.len() {
        let value = mem::take(&mut line[read]);

        if value == 0 {
            continue;
        }

        if mergeable && line[len - 1] == value && value < MAX_TILE {
            line[len - 1] = value * 2;
            score = score.saturating_add(value * 2);
            mergeable = false;
        } else {
            line[len] = value;
            len += 1;
            mergeable = true;
        }
    }

    score
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();

        if size < MIN_SIZE {
            return Err(GridError::TooSmall(size));
        }

        if size > MAX_SIZE {
            return Err(GridError::TooLarge(size));
        }

        let mut cells = Vec::with_capacity(size * size);

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();

            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }

            if let Some((col, &value)) = values
                .iter()
                .enumerate()
                .find(|&(_, &value)| !is_tile_value(value))
            {
                return Err(GridError::InvalidTile { row, col, value });
            }

            cells.extend_from_slice(values);
        }

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.size + col]
    }

    pub(crate) fn set(&mut self, position: Position, value: u64) {
        self.cells[position.row * self.size + position.col] = value;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.cells.chunks_exact(self.size)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == 0)
            .map(|(i, _)| Position {
                row: i / self.size,
                col: i % self.size,
            })
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    pub fn highest_tile(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.cells
            .iter()
            .fold(0, |sum: u64, &value| sum.saturating_add(value))
    }

    /// Moves every line towards the edge given by `direction`.
    ///
    /// Returns the score gained from merges, or `None` if no cell changed, in which case the grid
    /// is left untouched.
    pub fn shift(&mut self, direction: Direction) -> Option<u64> {
        let mut line = Vec::with_capacity(self.size);
        let mut changed = false;
        let mut score: u64 = 0;

        for index in 0..self.size {
            line.clear();
            line.extend(
                direction
                    .line_cells(self.size, index)
                    .map(|cell| self.cells[cell]),
            );

            score = score.saturating_add(merge_line(&mut line));

            for (cell, &value) in direction.line_cells(self.size, index).zip(&line) {
                changed |= self.cells[cell] != value;
                self.cells[cell] = value;
            }
        }

        changed.then_some(score)
    }

    /// The grid and score a move would produce, without touching `self`.
    pub fn try_move(&self, direction: Direction) -> Option<(Self, u64)> {
        let mut grid = self.clone();

        grid.shift(direction).map(|score| (grid, score))
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        self.try_move(direction).is_some()
    }

    /// Which moves would change the grid, in `Direction::ALL` order.
    pub fn legal_moves(&self) -> [bool; 4] {
        Direction::ALL.map(|direction| self.can_move(direction))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.highest_tile().max(1).to_string().len();

        for row in self.rows() {
            for (col, value) in row.iter().enumerate() {
                if col != 0 {
                    f.write_str(" ")?;
                }

                if *value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid<const N: usize>(rows: [[u64; N]; N]) -> Grid {
        Grid::from_rows(&rows).unwrap()
    }

    fn merged(mut line: Vec<u64>) -> (Vec<u64>, u64) {
        let score = merge_line(&mut line);
        (line, score)
    }

    #[test]
    fn triple_merges_only_the_leading_pair() {
        assert_eq!(merged(vec![2, 2, 2, 0]), (vec![4, 2, 0, 0], 4));
        assert_eq!(merged(vec![0, 2, 2, 2]), (vec![4, 2, 0, 0], 4));
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        assert_eq!(merged(vec![2, 2, 4, 0]), (vec![4, 4, 0, 0], 4));
        assert_eq!(merged(vec![4, 4, 8, 0]), (vec![8, 8, 0, 0], 8));
        assert_eq!(merged(vec![2, 2, 2, 2]), (vec![4, 4, 0, 0], 8));
    }

    #[test]
    fn largest_tiles_do_not_merge() {
        assert_eq!(
            merged(vec![MAX_TILE, MAX_TILE, 0]),
            (vec![MAX_TILE, MAX_TILE, 0], 0)
        );
        assert_eq!(
            merged(vec![0, MAX_TILE / 2, MAX_TILE / 2]),
            (vec![MAX_TILE, 0, 0], MAX_TILE)
        );

        let stuck = grid([[MAX_TILE, MAX_TILE], [2, 4]]);
        assert_eq!(stuck.legal_moves(), [false; 4]);
        assert_eq!(stuck.tile_sum(), u64::MAX);

        let mut full = grid([[MAX_TILE, MAX_TILE], [0, 0]]);
        assert_eq!(full.shift(Direction::Right), None);
        assert_eq!(full.shift(Direction::Down), Some(0));
        assert_eq!(full.rows().nth(1).unwrap(), [MAX_TILE, MAX_TILE]);
    }

    #[test]
    fn merge_line_compacts_across_gaps() {
        assert_eq!(merged(vec![2, 0, 0, 2]), (vec![4, 0, 0, 0], 4));
        assert_eq!(merged(vec![0, 4, 0, 8]), (vec![4, 8, 0, 0], 0));
        assert_eq!(merged(vec![2, 0, 4, 0, 4]), (vec![2, 8, 0, 0, 0], 8));
    }

    #[test]
    fn mirrored_rows_merge_symmetrically() {
        let mut left = grid([[0, 2, 2, 4], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(left.shift(Direction::Left), Some(4));
        assert_eq!(left.rows().next().unwrap(), [4, 4, 0, 0]);

        let mut right = grid([[4, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(right.shift(Direction::Right), Some(4));
        assert_eq!(right.rows().next().unwrap(), [0, 0, 4, 4]);
    }

    #[test]
    fn columns_merge_towards_their_edge() {
        let mut up = grid([[0, 0], [2, 0]]);
        let mut down = up.clone();

        assert_eq!(up.shift(Direction::Up), Some(0));
        assert_eq!(up, grid([[2, 0], [0, 0]]));
        assert_eq!(down.shift(Direction::Down), None);

        let mut column = grid([[2, 0, 0], [2, 0, 0], [2, 0, 0]]);
        assert_eq!(column.shift(Direction::Down), Some(4));
        assert_eq!(
            column,
            grid([[0, 0, 0], [2, 0, 0], [4, 0, 0]])
        );
    }

    #[test]
    fn no_op_shift_leaves_grid_untouched() {
        let settled = grid([[2, 4, 0], [8, 0, 0], [0, 0, 0]]);
        let mut shifted = settled.clone();

        assert_eq!(shifted.shift(Direction::Left), None);
        assert_eq!(shifted.shift(Direction::Up), None);
        assert_eq!(shifted, settled);
        assert!(settled.can_move(Direction::Right));
        assert!(settled.can_move(Direction::Down));
    }

    #[test]
    fn legal_moves_follow_direction_order() {
        let top_row = grid([[2, 4], [0, 0]]);

        assert_eq!(top_row.legal_moves(), [false, true, false, false]);
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert_eq!(Grid::from_rows(&[[2u64]]), Err(GridError::TooSmall(1)));
        assert_eq!(
            Grid::from_rows(&[vec![2u64, 0], vec![0]]),
            Err(GridError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            })
        );
        assert_eq!(
            Grid::from_rows(&[[2u64, 0], [0, 6]]),
            Err(GridError::InvalidTile {
                row: 1,
                col: 1,
                value: 6
            })
        );
        assert!(Grid::from_rows(&[[1u64, 0], [0, 0]]).is_err());
        assert_eq!(
            Grid::from_rows(vec![vec![0u64; 65]; 65].as_slice()),
            Err(GridError::TooLarge(65))
        );
    }

    #[test]
    fn queries_report_cells() {
        let grid = grid([[2, 0], [8, 4]]);

        assert_eq!(grid.size(), 2);
        assert_eq!(grid.get(1, 0), 8);
        assert_eq!(grid.empty_count(), 1);
        assert_eq!(
            grid.empty_cells().collect::<Vec<_>>(),
            [Position { row: 0, col: 1 }]
        );
        assert!(!grid.is_full());
        assert_eq!(grid.highest_tile(), 8);
        assert_eq!(grid.tile_sum(), 14);
        assert_eq!(grid.to_string(), "2 .\n8 4\n");
    }
}
