//! The 3x3 grid of cells.

use crate::common::{BoardError, Cell, Player};
use crate::config::{BOARD_SIZE, NUM_CELLS};
use core::fmt;

const SEPARATOR: &str = "---+---+---";

/// Row-major 3x3 grid. Plain data; turn discipline lives in the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "net", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: [Cell; NUM_CELLS],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; NUM_CELLS],
        }
    }

    fn index(row: usize, column: usize) -> Result<usize, BoardError> {
        if row >= BOARD_SIZE || column >= BOARD_SIZE {
            return Err(BoardError::OutOfBounds { row, column });
        }
        Ok(row * BOARD_SIZE + column)
    }

    /// Cell at (row, column).
    pub fn get(&self, row: usize, column: usize) -> Result<Cell, BoardError> {
        Ok(self.cells[Self::index(row, column)?])
    }

    /// Overwrite the cell at (row, column). No game rules are checked here.
    pub fn set(&mut self, row: usize, column: usize, cell: Cell) -> Result<(), BoardError> {
        let idx = Self::index(row, column)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// `true` when no square is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Row-major copy of all cells.
    pub fn cells(&self) -> [Cell; NUM_CELLS] {
        self.cells
    }

    /// Number of squares holding each player's mark, as (A, B).
    pub fn mark_counts(&self) -> (usize, usize) {
        self.cells
            .iter()
            .fold((0, 0), |(a, b), cell| match cell.player() {
                Some(Player::A) => (a + 1, b),
                Some(Player::B) => (a, b + 1),
                None => (a, b),
            })
    }

    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; NUM_CELLS];
    }

    /// Human readable layout. Empty squares show their 1-9 number so a
    /// player can pick one; taken squares show the owner's mark.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE {
            if row > 0 {
                out.push_str(SEPARATOR);
                out.push('\n');
            }
            let marks: Vec<String> = (0..BOARD_SIZE)
                .map(|column| {
                    let idx = row * BOARD_SIZE + column;
                    match self.cells[idx] {
                        Cell::Empty => (idx + 1).to_string(),
                        Cell::Taken(p) => p.mark().to_string(),
                    }
                })
                .collect();
            out.push(' ');
            out.push_str(&marks.join(" | "));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
