use log::trace;

use crate::{
    moves::{GameEvent, Move, SpecialMove},
    piece::{Color, Piece, PieceType, PieceView},
    rules::{self, KINGSIDE_ROOK_FILE, KING_START_FILE, QUEENSIDE_ROOK_FILE},
    Square,
};

/// Piece placement. Keeps pieces in insertion order so iteration is
/// deterministic; does not enforce bounds or square uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    /// Standard 32-piece starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    pub fn empty() -> Self {
        Self { pieces: Vec::with_capacity(32) }
    }

    pub fn setup_initial_position(&mut self) {
        self.pieces.clear();

        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for color in [Color::Black, Color::White] {
            let back_rank = color.home_rank();
            for (file, &piece_type) in (0..8).zip(piece_order.iter()) {
                self.add(Piece::new(piece_type, color, Square { file, rank: back_rank }));
            }
            for file in 0..8 {
                let square = Square { file, rank: color.pawn_start_rank() };
                self.add(Piece::new(PieceType::Pawn, color, square));
            }
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |piece| piece.color == color)
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.position == square)
    }

    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|piece| piece.position == square)
    }

    pub fn add(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Removes and returns the piece on `square`, if any.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let index = self.pieces.iter().position(|piece| piece.position == square)?;
        Some(self.pieces.remove(index))
    }

    /// Relocates whatever stands on `from`. The caller owns legality and
    /// clearing the destination.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.piece_at_mut(from) {
            piece.position = to;
        }
    }

    pub fn board_state(&self) -> Vec<PieceView> {
        self.pieces.iter().map(PieceView::from).collect()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces
            .iter()
            .find(|piece| piece.piece_type == PieceType::King && piece.color == color)
            .map(|piece| piece.position)
    }

    /// Pseudo-legal destinations of the piece on `square`.
    pub fn pseudo_legal_targets(&self, square: Square) -> Vec<Square> {
        self.piece_at(square)
            .map(|piece| rules::valid_moves(piece, self))
            .unwrap_or_default()
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        let king_pos = match self.king_square(color) {
            Some(square) => square,
            None => return false,
        };

        self.pieces_of(color.opposite())
            .any(|attacker| rules::valid_moves(attacker, self).contains(&king_pos))
    }

    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        self.pieces_of(by)
            .any(|attacker| rules::attacked_squares(attacker, self).contains(&square))
    }

    /// Builds the [`Move`] for `from -> to`, tagging castling, en passant and
    /// promotion from the current occupancy. Does not check legality.
    pub fn classify(&self, from: Square, to: Square) -> Move {
        let piece = match self.piece_at(from) {
            Some(piece) => piece,
            None => return Move::new(from, to),
        };

        let file_diff = to.file as i8 - from.file as i8;
        let special = match piece.piece_type {
            PieceType::King if file_diff == 2 => Some(SpecialMove::CastleKingside),
            PieceType::King if file_diff == -2 => Some(SpecialMove::CastleQueenside),
            PieceType::Pawn if to.rank == piece.color.promotion_rank() => {
                Some(SpecialMove::Promotion)
            }
            PieceType::Pawn if file_diff != 0 && self.piece_at(to).is_none() => {
                Some(SpecialMove::EnPassantCapture)
            }
            _ => None,
        };

        Move { from, to, special }
    }

    /// Pseudo-legal moves for every piece of `color`, in board order.
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        self.pieces_of(color)
            .flat_map(|piece| {
                rules::valid_moves(piece, self)
                    .into_iter()
                    .map(move |to| (piece.position, to))
            })
            .map(|(from, to)| self.classify(from, to))
            .collect()
    }

    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.pseudo_legal_moves(color)
            .into_iter()
            .filter(|&mv| self.is_legal(mv, color))
            .collect()
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pseudo_legal_moves(color)
            .into_iter()
            .any(|mv| self.is_legal(mv, color))
    }

    /// Castling out of check or across an attacked square.
    pub fn castles_through_check(&self, mv: Move, color: Color) -> bool {
        if !mv.is_castle() {
            return false;
        }
        let transit = Square {
            file: (mv.from.file + mv.to.file) / 2,
            rank: mv.from.rank,
        };
        self.is_in_check(color) || self.is_square_attacked(transit, color.opposite())
    }

    pub fn leaves_king_in_check(&self, mv: Move, color: Color) -> bool {
        let mut trial = self.clone();
        trial.apply_move(mv);
        trial.is_in_check(color)
    }

    pub fn is_legal(&self, mv: Move, color: Color) -> bool {
        !self.castles_through_check(mv, color) && !self.leaves_king_in_check(mv, color)
    }

    /// Plays `mv` in place with all side effects: captures, castling rook hop,
    /// en passant removal, promotion to queen, `has_moved` and single-ply
    /// en passant bookkeeping. No legality checks.
    pub fn apply_move(&mut self, mv: Move) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mover = match self.piece_at(mv.from) {
            Some(piece) => *piece,
            None => return events,
        };

        if let Some(captured) = self.remove(mv.to) {
            events.push(GameEvent::PieceCaptured {
                captured: PieceView::from(&captured),
            });
        }

        match mv.special {
            Some(SpecialMove::EnPassantCapture) => {
                let victim_square = Square { file: mv.to.file, rank: mv.from.rank };
                if let Some(captured) = self.remove(victim_square) {
                    events.push(GameEvent::EnPassantCaptured {
                        captured: PieceView::from(&captured),
                        landing: mv.to,
                    });
                }
            }
            Some(side @ (SpecialMove::CastleKingside | SpecialMove::CastleQueenside)) => {
                let rank = mv.from.rank;
                let (rook_file, rook_target) = if side == SpecialMove::CastleKingside {
                    (KINGSIDE_ROOK_FILE, KING_START_FILE + 1)
                } else {
                    (QUEENSIDE_ROOK_FILE, KING_START_FILE - 1)
                };
                let rook_from = Square { file: rook_file, rank };
                let rook_to = Square { file: rook_target, rank };
                if let Some(rook) = self.piece_at_mut(rook_from) {
                    rook.position = rook_to;
                    rook.has_moved = true;
                    events.push(GameEvent::CastlePerformed {
                        color: mover.color,
                        side,
                        rook_from,
                        rook_to,
                    });
                }
            }
            _ => {}
        }

        self.move_piece(mv.from, mv.to);

        for piece in self.pieces.iter_mut() {
            piece.en_passant_eligible = false;
        }

        if let Some(piece) = self.piece_at_mut(mv.to) {
            match piece.piece_type {
                PieceType::King | PieceType::Rook => piece.has_moved = true,
                PieceType::Pawn => {
                    piece.en_passant_eligible = (mv.to.rank as i8 - mv.from.rank as i8).abs() == 2;
                }
                _ => {}
            }
        }

        if mover.piece_type == PieceType::Pawn && mv.to.rank == mover.color.promotion_rank() {
            self.remove(mv.to);
            self.add(Piece::new(PieceType::Queen, mover.color, mv.to));
            events.push(GameEvent::PawnPromoted {
                color: mover.color,
                square: mv.to,
            });
        }

        trace!("applied {} ({} events)", mv, events.len());
        events
    }
}
