use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{Result, RoundError};

/// Difficulty of a round; a round at level `n` has a sequence of `n + 1` steps.
pub type Level = u8;

/// Timer delay in milliseconds.
pub type Millis = u32;

/// Event timestamp in milliseconds, as reported by the input source.
pub type Timestamp = f64;

/// Side length of the square board.
pub const GRID_SIDE: u8 = 3;

/// Number of cells on the board.
pub const CELL_COUNT: u8 = GRID_SIDE * GRID_SIDE;

/// Position of a cell on the board, always in `0..CELL_COUNT`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellIndex(u8);

impl CellIndex {
    pub const fn new(index: u8) -> Result<Self> {
        if index < CELL_COUNT {
            Ok(Self(index))
        } else {
            Err(RoundError::InvalidCellIndex(index))
        }
    }

    pub(crate) const fn new_unchecked(index: u8) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Column and row of this cell, `(x, y)`.
    pub const fn grid_position(self) -> (u8, u8) {
        (self.0 % GRID_SIDE, self.0 / GRID_SIDE)
    }

    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT).map(Self::new_unchecked)
    }
}

impl TryFrom<u8> for CellIndex {
    type Error = RoundError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl From<CellIndex> for u8 {
    fn from(index: CellIndex) -> Self {
        index.0
    }
}

impl From<CellIndex> for usize {
    fn from(index: CellIndex) -> Self {
        index.0.into()
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // players count cells from 1
        write!(f, "{}", self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_indices_outside_the_board() {
        assert_eq!(CellIndex::new(9), Err(RoundError::InvalidCellIndex(9)));
        assert_eq!(CellIndex::new(8).map(CellIndex::get), Ok(8));
    }

    #[test]
    fn grid_position_is_row_major() {
        let index = CellIndex::new(5).unwrap();
        assert_eq!(index.grid_position(), (2, 1));
    }

    #[test]
    fn all_yields_every_cell_once() {
        let indices: alloc::vec::Vec<u8> = CellIndex::all().map(CellIndex::get).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn deserializing_checks_range() {
        assert!(serde_json::from_str::<CellIndex>("4").is_ok());
        assert!(serde_json::from_str::<CellIndex>("12").is_err());
    }
}
