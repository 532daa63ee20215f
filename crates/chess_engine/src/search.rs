// Fixed-depth minimax with alpha-beta pruning over value snapshots.
//
// Every node decodes its own `Snapshot`, so recursion never aliases the live
// game and needs no undo. The price is one board copy per simulated move and
// the loss of castling/en passant state below the root (see `Snapshot`).
use chess_core::{Board, Color, Move, Snapshot};
use log::trace;

use crate::evaluation::evaluate;

pub const DEFAULT_SEARCH_DEPTH: u8 = 2;
pub const MATE_SCORE: i32 = 1_000_000;
pub const INFINITY: i32 = 2_000_000;

// Scores are White-relative throughout: White maximizes, Black minimizes.
const SCORE_PERSPECTIVE: Color = Color::White;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub score: i32,
    pub best_move: Option<Move>,
    pub nodes: u64,
}

/// Searches `depth` plies below `snapshot`. `maximizing` is true when White is
/// to move. Returns the White-relative score and the best move, or `None` for
/// the move at depth 0 and in positions without a legal move.
pub fn search(
    snapshot: &Snapshot,
    depth: u8,
    maximizing: bool,
    alpha: i32,
    beta: i32,
) -> (i32, Option<Move>) {
    let outcome = search_with_stats(snapshot, depth, maximizing, alpha, beta);
    (outcome.score, outcome.best_move)
}

pub fn search_with_stats(
    snapshot: &Snapshot,
    depth: u8,
    maximizing: bool,
    alpha: i32,
    beta: i32,
) -> SearchOutcome {
    let mut nodes = 0;
    let (score, best_move) = alpha_beta(snapshot, depth, maximizing, alpha, beta, &mut nodes);
    SearchOutcome { score, best_move, nodes }
}

fn alpha_beta(
    snapshot: &Snapshot,
    depth: u8,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;
    let board = snapshot.to_board();

    if depth == 0 {
        return (evaluate(&board, SCORE_PERSPECTIVE), None);
    }

    let side = side_to_move(maximizing);
    let mut best_score = if maximizing { -INFINITY } else { INFINITY };
    let mut best_move = None;

    for mv in ordered_moves(&board, side) {
        let child = match simulate(&board, mv, side) {
            Some(child) => child,
            None => continue,
        };

        let (score, _) = alpha_beta(&child, depth - 1, !maximizing, alpha, beta, nodes);

        if maximizing {
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
        } else {
            if score < best_score {
                best_score = score;
                best_move = Some(mv);
            }
            beta = beta.min(score);
        }

        if beta <= alpha {
            trace!("cutoff at depth {} after {}", depth, mv);
            break;
        }
    }

    if best_move.is_none() {
        return (terminal_score(&board, side, depth), None);
    }

    (best_score, best_move)
}

/// Plain minimax without pruning. Same scores as [`search`], far more nodes.
pub fn minimax(snapshot: &Snapshot, depth: u8, maximizing: bool) -> (i32, Option<Move>) {
    let board = snapshot.to_board();
    if depth == 0 {
        return (evaluate(&board, SCORE_PERSPECTIVE), None);
    }

    let side = side_to_move(maximizing);
    let mut best: Option<(i32, Move)> = None;
    for mv in ordered_moves(&board, side) {
        let child = match simulate(&board, mv, side) {
            Some(child) => child,
            None => continue,
        };
        let (score, _) = minimax(&child, depth - 1, !maximizing);
        let better = match best {
            None => true,
            Some((best_score, _)) if maximizing => score > best_score,
            Some((best_score, _)) => score < best_score,
        };
        if better {
            best = Some((score, mv));
        }
    }

    match best {
        Some((score, mv)) => (score, Some(mv)),
        None => (terminal_score(&board, side, depth), None),
    }
}

/// Pseudo-legal moves for `side`, captures first. The sort is stable so
/// moves keep board order within each group.
pub fn ordered_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut moves = board.pseudo_legal_moves(side);
    moves.sort_by_key(|mv| board.piece_at(mv.to).is_none());
    moves
}

/// Plays `mv` on a copy and returns the resulting snapshot, or `None` if the
/// move would leave `side` in check.
fn simulate(board: &Board, mv: Move, side: Color) -> Option<Snapshot> {
    if board.castles_through_check(mv, side) {
        return None;
    }
    let mut child = board.clone();
    child.apply_move(mv);
    if child.is_in_check(side) {
        return None;
    }
    Some(Snapshot::encode(&child))
}

// Mate scores grow with the remaining depth so that quicker mates win out.
fn terminal_score(board: &Board, side: Color, depth: u8) -> i32 {
    if !board.is_in_check(side) {
        return 0;
    }
    let mate = MATE_SCORE + depth as i32;
    match side {
        Color::White => -mate,
        Color::Black => mate,
    }
}

fn side_to_move(maximizing: bool) -> Color {
    if maximizing {
        Color::White
    } else {
        Color::Black
    }
}
