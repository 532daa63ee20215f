use chess_core::{Board, Color, PieceType, Square};

// Material values in centipawns
const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 280;
const BISHOP_VALUE: i32 = 320;
const ROOK_VALUE: i32 = 479;
const QUEEN_VALUE: i32 = 929;
const KING_VALUE: i32 = 60000;

// Piece-square tables, seen from White's side of the board: index 0 is a8,
// index 63 is h1. Black pieces read the table rotated by 180 degrees.

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     78,  83,  86,  73, 102,  82,  85,  90,
      7,  29,  21,  44,  40,  31,  44,   7,
    -17,  16,  -2,  15,  14,   0,  15, -13,
    -26,   3,  10,   9,   6,   1,   0, -23,
    -22,   9,   5, -11, -10,  -2,   3, -19,
    -31,   8,  -7, -37, -36, -14,   3, -31,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -66, -53, -75, -75, -10, -55, -58, -70,
     -3,  -6, 100, -36,   4,  62,  -4, -14,
     10,  67,   1,  74,  73,  27,  62,  -2,
     24,  24,  45,  37,  33,  41,  25,  17,
     -1,   5,  31,  21,  22,  35,   2,   0,
    -18,  10,  13,  22,  18,  15,  11, -14,
    -23, -15,   2,   0,   2,   0, -23, -20,
    -74, -23, -26, -24, -19, -35, -22, -69,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -59, -78, -82, -76, -23,-107, -37, -50,
    -11,  20,  35, -42, -39,  31,   2, -22,
     -9,  39, -32,  41,  52, -10,  28, -14,
     25,  17,  20,  34,  26,  25,  15,  10,
     13,  10,  17,  23,  17,  16,   0,   7,
     14,  25,  24,  15,   8,  25,  20,  15,
     19,  20,  11,   6,   7,   6,  20,  16,
     -7,   2, -15, -12, -14, -15, -10, -10,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     35,  29,  33,   4,  37,  33,  56,  50,
     55,  29,  56,  67,  55,  62,  34,  60,
     19,  35,  28,  33,  45,  27,  25,  15,
      0,   5,  16,  13,  18,  -4,  -9,  -6,
    -28, -35, -16, -21, -13, -29, -46, -30,
    -42, -28, -42, -25, -25, -35, -26, -46,
    -53, -38, -31, -26, -29, -43, -44, -53,
    -30, -24, -18,   5,  -2, -18, -31, -32,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
      6,   1,  -8,-104,  69,  24,  88,  26,
     14,  32,  60, -10,  20,  76,  57,  24,
     -2,  43,  32,  60,  72,  63,  43,   2,
      1, -16,  22,  17,  25,  20, -13,  -6,
    -14, -15,  -2,  -5,  -1, -10, -20, -22,
    -30,  -6, -13, -11, -16, -11, -16, -27,
    -36, -18,   0, -19, -15, -15, -21, -38,
    -39, -30, -31, -13, -31, -36, -34, -42,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
      4,  54,  47, -99, -99,  60,  83, -62,
    -32,  10,  55,  56,  56,  55,  10,   3,
    -62,  12, -57,  44, -67,  28,  37, -31,
    -55,  50,  11,  -4, -19,  13,   0, -49,
    -55, -43, -52, -28, -51, -47,  -8, -50,
    -47, -42, -43, -79, -64, -32, -29, -32,
     -4,   3, -14, -50, -57, -18,  13,   4,
     17,  30,  -3, -14,   6,  -1,  40,  18,
];

/// Material plus piece-square score of `board`, relative to `color`:
/// positive favours `color`, negative favours its opponent.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let mut score = 0;

    for piece in board.pieces() {
        let value = piece_value(piece.piece_type)
            + position_bonus(piece.piece_type, piece.position, piece.color);
        if piece.color == Color::White {
            score += value;
        } else {
            score -= value;
        }
    }

    match color {
        Color::White => score,
        Color::Black => -score,
    }
}

pub fn piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}

fn position_bonus(piece_type: PieceType, square: Square, color: Color) -> i32 {
    let row = 7 - square.rank as usize;
    let file = square.file as usize;
    let index = match color {
        Color::White => row * 8 + file,
        Color::Black => (7 - row) * 8 + (7 - file),
    };

    let table = match piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King => &KING_TABLE,
    };
    table[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Piece, Snapshot};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn lone_pieces_score_material_plus_table() {
        let mut board = Board::empty();
        board.add(Piece::new(PieceType::Knight, Color::White, sq("c3")));
        // c3 is row 5, file 2 of the knight table
        assert_eq!(evaluate(&board, Color::White), KNIGHT_VALUE + 13);
        assert_eq!(evaluate(&board, Color::Black), -(KNIGHT_VALUE + 13));
    }

    #[test]
    fn black_reads_rotated_table() {
        let mut white = Board::empty();
        white.add(Piece::new(PieceType::Queen, Color::White, sq("b2")));
        let mut black = Board::empty();
        black.add(Piece::new(PieceType::Queen, Color::Black, sq("g7")));
        // b2 and g7 are the same table square after rotation
        assert_eq!(evaluate(&white, Color::White), evaluate(&black, Color::Black));
    }

    #[test]
    fn mirrored_position_is_balanced() {
        // Rotating the board 180 degrees and swapping colors preserves the score
        let rows = "....k...\n........\n..n.....\n........\n........\n.....N..\n........\n...K....";
        let board: Snapshot = rows.parse().unwrap();
        assert_eq!(evaluate(&board.to_board(), Color::White), 0);
    }

    #[test]
    fn extra_material_favours_its_owner() {
        let rows = "....k...\n........\n........\n........\n........\n........\n........\nR...K...";
        let board: Snapshot = rows.parse().unwrap();
        let board = board.to_board();
        assert!(evaluate(&board, Color::White) > ROOK_VALUE - 100);
        assert_eq!(evaluate(&board, Color::White), -evaluate(&board, Color::Black));
    }
}
