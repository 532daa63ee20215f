use thiserror::Error;

use crate::{game::GameStatus, Square};

/// Why `Game::submit_move` refused a move. The game is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on {0}")]
    NoPiece(Square),
    #[error("not your turn")]
    NotYourTurn,
    #[error("{from} cannot move to {to}")]
    IllegalMove { from: Square, to: Square },
    #[error("move would leave the king in check")]
    SelfCheck,
    #[error("cannot castle out of or through check")]
    CastlingThroughCheck,
    #[error("game is over: {0:?}")]
    GameOver(GameStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} has {len} squares, expected 8")]
    RowLength { row: usize, len: usize },
    #[error("invalid piece symbol {0:?}")]
    InvalidChar(char),
}
