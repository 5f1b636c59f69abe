#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];

    pub fn iter() -> impl Iterator<Item = Self> + Clone {
        Self::ALL.into_iter()
    }

    /// Flat row-major indices of line `index` on a `size * size` grid, ordered from the edge
    /// tiles move towards to the opposite edge.
    ///
    /// Rows are lines for `Left`/`Right`, columns for `Up`/`Down`.
    pub fn line_cells(self, size: usize, index: usize) -> impl Iterator<Item = usize> {
        (0..size).map(move |step| {
            let (row, col) = match self {
                Self::Left => (index, step),
                Self::Right => (index, size - 1 - step),
                Self::Up => (step, index),
                Self::Down => (size - 1 - step, index),
            };

            row * size + col
        })
    }
}
