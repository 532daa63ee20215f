//! Value-type copy of a board: an 8x8 grid of `KQRBNPkqrbnp.` characters.
//!
//! Rows run from rank 8 down to rank 1. The encoding keeps piece type, color
//! and square but drops `has_moved` and `en_passant_eligible`, so a decoded
//! board treats every king and rook as unmoved and never offers en passant.

use std::{fmt, str::FromStr};

use crate::{error::SnapshotError, Board, Piece, Square};

const EMPTY: u8 = b'.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    rows: [[u8; 8]; 8],
}

impl Snapshot {
    pub fn encode(board: &Board) -> Self {
        let mut rows = [[EMPTY; 8]; 8];
        // Off-board pieces have no cell and are left out
        for piece in board.pieces() {
            if let Some((row, file)) = cell_index(piece.position) {
                rows[row][file] = piece.symbol() as u8;
            }
        }
        Self { rows }
    }

    /// Decodes into a fresh board, pieces ordered rank 8 to rank 1, a to h.
    pub fn to_board(&self) -> Board {
        let mut board = Board::empty();
        for (row, cells) in self.rows.iter().enumerate() {
            for (file, &cell) in cells.iter().enumerate() {
                let square = Square { file: file as u8, rank: 7 - row as u8 };
                if let Some(piece) = Piece::from_symbol(cell as char, square) {
                    board.add(piece);
                }
            }
        }
        board
    }

    /// `'.'` for empty squares and for coordinates off the board.
    pub fn symbol_at(&self, square: Square) -> char {
        match cell_index(square) {
            Some((row, file)) => self.rows[row][file] as char,
            None => EMPTY as char,
        }
    }
}

fn cell_index(square: Square) -> Option<(usize, usize)> {
    let square = Square::new(square.file, square.rank)?;
    Some((7 - square.rank as usize, square.file as usize))
}

impl From<&Board> for Snapshot {
    fn from(board: &Board) -> Self {
        Self::encode(board)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for &cell in row {
                write!(f, "{}", cell as char)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Snapshot {
    type Err = SnapshotError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
        if lines.len() != 8 {
            return Err(SnapshotError::RowCount(lines.len()));
        }

        let mut rows = [[EMPTY; 8]; 8];
        for (row, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != 8 {
                return Err(SnapshotError::RowLength { row, len });
            }
            for (file, symbol) in line.chars().enumerate() {
                if symbol != EMPTY as char && !"KQRBNPkqrbnp".contains(symbol) {
                    return Err(SnapshotError::InvalidChar(symbol));
                }
                rows[row][file] = symbol as u8;
            }
        }

        Ok(Self { rows })
    }
}
