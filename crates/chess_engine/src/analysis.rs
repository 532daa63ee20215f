use chess_core::{Color, Game, Move, Snapshot};
use rayon::prelude::*;

use crate::search::{search, INFINITY};

/// Scores every legal move of the side to move with its own full-window
/// search `depth - 1` plies deep, best move first for that side. Moves are
/// searched in parallel; each search owns its snapshot.
pub fn analyse_root_moves(game: &Game, depth: u8) -> Vec<(Move, i32)> {
    let side = game.side_to_move();
    let board = game.board();
    let child_depth = depth.saturating_sub(1);
    let child_maximizing = side.opposite() == Color::White;

    let mut scored: Vec<(Move, i32)> = game
        .legal_moves()
        .into_par_iter()
        .map(|mv| {
            let mut child = board.clone();
            child.apply_move(mv);
            let (score, _) = search(
                &Snapshot::encode(&child),
                child_depth,
                child_maximizing,
                -INFINITY,
                INFINITY,
            );
            (mv, score)
        })
        .collect();

    match side {
        Color::White => scored.sort_by_key(|&(_, score)| -score),
        Color::Black => scored.sort_by_key(|&(_, score)| score),
    }
    scored
}
