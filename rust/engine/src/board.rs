use std::fmt;

use crate::piece::PieceId;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 5;

/// A cell coordinate on the 5x5 board. Row 0 is Player B's back rank,
/// row 4 is Player A's back rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Build a square from in-bounds coordinates. Returns `None` when either
    /// coordinate falls outside the board.
    pub fn new(row: i8, col: i8) -> Option<Square> {
        let size = BOARD_SIZE as i8;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square reached by the given (row, col) displacement, if in bounds.
    pub fn offset(self, rows: i8, cols: i8) -> Option<Square> {
        Square::new(self.row as i8 + rows, self.col as i8 + cols)
    }

    /// Iterate over all 25 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE as u8)
            .flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The 5x5 grid. Each cell holds at most one piece; a live piece occupies
/// exactly one cell.
#[derive(Debug, Clone, Default)]
pub struct Board {
    cells: [[Option<PieceId>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Board {
        Board::default()
    }

    pub fn get(&self, square: Square) -> Option<PieceId> {
        self.cells[square.row as usize][square.col as usize]
    }

    /// Put a piece on a square, returning whatever previously occupied it.
    pub fn place(&mut self, square: Square, piece: PieceId) -> Option<PieceId> {
        self.cells[square.row as usize][square.col as usize].replace(piece)
    }

    /// Clear a square, returning the removed occupant if any.
    pub fn take(&mut self, square: Square) -> Option<PieceId> {
        self.cells[square.row as usize][square.col as usize].take()
    }

    /// Locate a piece by scanning the grid. A captured piece has no square.
    pub fn find(&self, piece: PieceId) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Some(piece))
    }

    /// The board as rows of piece labels, the shape the wire snapshot uses.
    pub fn label_rows(&self) -> Vec<Vec<Option<String>>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(|p| p.label())).collect())
            .collect()
    }
}
