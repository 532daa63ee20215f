//! Pseudo-legal move generation, one rule set per piece type.
//!
//! Nothing here checks whether a move leaves the mover's own king in check;
//! that filtering belongs to [`Board::is_legal`](crate::Board::is_legal).

use crate::{Board, Piece, PieceType, Square};

const KING_STEPS: [(i8, i8); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
const KNIGHT_JUMPS: [(i8, i8); 8] =
    [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
const ROOK_RAYS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const BISHOP_RAYS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const KING_START_FILE: u8 = 4;
pub const KINGSIDE_ROOK_FILE: u8 = 7;
pub const QUEENSIDE_ROOK_FILE: u8 = 0;

/// Destination squares for `piece` given the current occupancy of `board`.
pub fn valid_moves(piece: &Piece, board: &Board) -> Vec<Square> {
    match piece.piece_type {
        PieceType::King => {
            let mut moves = step_moves(piece, board, &KING_STEPS);
            moves.extend(castling_moves(piece, board));
            moves
        }
        PieceType::Queen => {
            let mut moves = ray_moves(piece, board, &ROOK_RAYS);
            moves.extend(ray_moves(piece, board, &BISHOP_RAYS));
            moves
        }
        PieceType::Rook => ray_moves(piece, board, &ROOK_RAYS),
        PieceType::Bishop => ray_moves(piece, board, &BISHOP_RAYS),
        PieceType::Knight => step_moves(piece, board, &KNIGHT_JUMPS),
        PieceType::Pawn => pawn_moves(piece, board),
    }
}

/// Squares `piece` threatens. Differs from [`valid_moves`] for pawns (diagonals
/// only, occupied or not) and kings (no castling hop), and includes squares
/// held by the piece's own side.
pub fn attacked_squares(piece: &Piece, board: &Board) -> Vec<Square> {
    match piece.piece_type {
        PieceType::King => steps(piece.position, &KING_STEPS).collect(),
        PieceType::Knight => steps(piece.position, &KNIGHT_JUMPS).collect(),
        PieceType::Pawn => {
            let forward = piece.color.forward();
            [-1, 1]
                .iter()
                .filter_map(|&side| piece.position.offset(side, forward))
                .collect()
        }
        PieceType::Rook => rays(piece.position, board, &ROOK_RAYS),
        PieceType::Bishop => rays(piece.position, board, &BISHOP_RAYS),
        PieceType::Queen => {
            let mut squares = rays(piece.position, board, &ROOK_RAYS);
            squares.extend(rays(piece.position, board, &BISHOP_RAYS));
            squares
        }
    }
}

fn steps(from: Square, offsets: &'static [(i8, i8)]) -> impl Iterator<Item = Square> {
    offsets.iter().filter_map(move |&(df, dr)| from.offset(df, dr))
}

fn step_moves(piece: &Piece, board: &Board, offsets: &'static [(i8, i8)]) -> Vec<Square> {
    steps(piece.position, offsets)
        .filter(|&to| board.piece_at(to).map_or(true, |target| target.color != piece.color))
        .collect()
}

fn ray_moves(piece: &Piece, board: &Board, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(df, dr) in directions {
        let mut current = piece.position;
        while let Some(next) = current.offset(df, dr) {
            match board.piece_at(next) {
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(next);
                    }
                    break;
                }
                None => moves.push(next),
            }
            current = next;
        }
    }
    moves
}

// Every square along each ray up to and including the first occupied one.
fn rays(from: Square, board: &Board, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut squares = Vec::new();
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            squares.push(next);
            if board.piece_at(next).is_some() {
                break;
            }
            current = next;
        }
    }
    squares
}

fn castling_moves(king: &Piece, board: &Board) -> Vec<Square> {
    let rank = king.color.home_rank();
    if king.has_moved || king.position != (Square { file: KING_START_FILE, rank }) {
        return Vec::new();
    }

    let mut moves = Vec::new();
    let sides = [(KINGSIDE_ROOK_FILE, 6u8), (QUEENSIDE_ROOK_FILE, 2u8)];
    for (rook_file, king_target) in sides {
        let rook_ready = board.piece_at(Square { file: rook_file, rank }).map_or(false, |rook| {
            rook.piece_type == PieceType::Rook && rook.color == king.color && !rook.has_moved
        });
        if !rook_ready {
            continue;
        }

        let (low, high) = if rook_file > KING_START_FILE {
            (KING_START_FILE + 1, rook_file)
        } else {
            (rook_file + 1, KING_START_FILE)
        };
        let path_clear = (low..high).all(|file| board.piece_at(Square { file, rank }).is_none());
        if path_clear {
            moves.push(Square { file: king_target, rank });
        }
    }
    moves
}

fn pawn_moves(pawn: &Piece, board: &Board) -> Vec<Square> {
    let mut moves = Vec::new();
    let forward = pawn.color.forward();

    if let Some(one_step) = pawn.position.offset(0, forward) {
        if board.piece_at(one_step).is_none() {
            moves.push(one_step);
            if pawn.position.rank == pawn.color.pawn_start_rank() {
                if let Some(two_step) = pawn.position.offset(0, 2 * forward) {
                    if board.piece_at(two_step).is_none() {
                        moves.push(two_step);
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        let target = match pawn.position.offset(side, forward) {
            Some(target) => target,
            None => continue,
        };
        match board.piece_at(target) {
            Some(victim) if victim.color != pawn.color => moves.push(target),
            Some(_) => {}
            None => {
                let beside = Square { file: target.file, rank: pawn.position.rank };
                let en_passant = board.piece_at(beside).map_or(false, |victim| {
                    victim.piece_type == PieceType::Pawn
                        && victim.color != pawn.color
                        && victim.en_passant_eligible
                });
                if en_passant {
                    moves.push(target);
                }
            }
        }
    }

    moves
}
