use log::{debug, info};

use crate::{
    error::MoveError,
    moves::{GameEvent, Move},
    piece::{Color, PieceView},
    Board, Snapshot, Square,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Result of a successful [`Game::submit_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mv: Move,
    pub events: Vec<GameEvent>,
    pub status: GameStatus,
}

/// Turn management and move application on top of a live [`Board`].
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    last_move: Option<Move>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    /// Starts from an arbitrary position. The status is computed immediately,
    /// so a position with no legal moves is already over.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        let status = terminal_status(&board, side_to_move);
        Self {
            board,
            side_to_move,
            last_move: None,
            status,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board_state(&self) -> Vec<PieceView> {
        self.board.board_state()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::encode(&self.board)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    /// Legal destinations for the piece on `square`; empty unless that piece
    /// belongs to the side to move.
    pub fn valid_moves(&self, square: Square) -> Vec<Square> {
        match self.board.piece_at(square) {
            Some(piece) if piece.color == self.side_to_move && !self.status.is_over() => self
                .board
                .pseudo_legal_targets(square)
                .into_iter()
                .filter(|&to| {
                    self.board.is_legal(self.board.classify(square, to), self.side_to_move)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status.is_over() {
            return Vec::new();
        }
        self.board.legal_moves(self.side_to_move)
    }

    pub fn submit_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver(self.status));
        }

        let piece = *self.board.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        if piece.color != self.side_to_move {
            return Err(MoveError::NotYourTurn);
        }

        if !self.board.pseudo_legal_targets(from).contains(&to) {
            debug!("rejected {}{}: not a reachable square", from, to);
            return Err(MoveError::IllegalMove { from, to });
        }

        let mv = self.board.classify(from, to);
        if self.board.castles_through_check(mv, piece.color) {
            debug!("rejected {}: castling out of or through check", mv);
            return Err(MoveError::CastlingThroughCheck);
        }

        // Play on a copy so a self-check rejection leaves nothing behind
        let mut trial = self.board.clone();
        let events = trial.apply_move(mv);
        if trial.is_in_check(piece.color) {
            debug!("rejected {}: leaves {:?} king in check", mv, piece.color);
            return Err(MoveError::SelfCheck);
        }

        self.board = trial;
        self.side_to_move = self.side_to_move.opposite();
        self.last_move = Some(mv);
        self.status = terminal_status(&self.board, self.side_to_move);

        debug!("applied {} for {:?}", mv, piece.color);
        if self.status.is_over() {
            info!("game over: {:?}", self.status);
        }

        Ok(MoveOutcome {
            mv,
            events,
            status: self.status,
        })
    }
}

fn terminal_status(board: &Board, side_to_move: Color) -> GameStatus {
    if board.has_legal_move(side_to_move) {
        GameStatus::Ongoing
    } else if board.is_in_check(side_to_move) {
        GameStatus::Checkmate { winner: side_to_move.opposite() }
    } else {
        GameStatus::Stalemate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{moves::SpecialMove, PieceType};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn game(rows: &str, side_to_move: Color) -> Game {
        Game::from_board(rows.parse::<Snapshot>().unwrap().to_board(), side_to_move)
    }

    fn play(game: &mut Game, from: &str, to: &str) -> MoveOutcome {
        game.submit_move(sq(from), sq(to)).unwrap()
    }

    #[test]
    fn opening_move_flips_turn_and_records_last_move() {
        let mut g = Game::new();
        let outcome = play(&mut g, "e2", "e4");
        assert_eq!(outcome.status, GameStatus::Ongoing);
        assert!(outcome.events.is_empty());
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.last_move(), Some(Move::new(sq("e2"), sq("e4"))));
        assert!(g.board().piece_at(sq("e4")).unwrap().en_passant_eligible);
    }

    #[test]
    fn rejects_unreachable_and_out_of_turn_moves() {
        let mut g = Game::new();
        assert_eq!(
            g.submit_move(sq("e2"), sq("e5")),
            Err(MoveError::IllegalMove { from: sq("e2"), to: sq("e5") })
        );
        assert_eq!(g.submit_move(sq("e7"), sq("e5")), Err(MoveError::NotYourTurn));
        assert_eq!(g.submit_move(sq("e4"), sq("e5")), Err(MoveError::NoPiece(sq("e4"))));
        assert_eq!(g.side_to_move(), Color::White);
        assert_eq!(g.snapshot(), Snapshot::encode(&Board::new()));
    }

    #[test]
    fn self_check_leaves_board_untouched() {
        // Bishop on e2 is pinned against the king by the rook on e8
        let mut g = game(
            "....r..k\n........\n........\n........\n........\n........\n....B...\n....K...",
            Color::White,
        );
        let before = g.snapshot();
        assert_eq!(g.submit_move(sq("e2"), sq("d3")), Err(MoveError::SelfCheck));
        assert_eq!(g.snapshot(), before);
        assert_eq!(g.side_to_move(), Color::White);
        assert!(g.last_move().is_none());
    }

    #[test]
    fn self_check_capture_restores_victim() {
        // Taking the knight with the king walks into the rook's file
        let mut g = game(
            "...r...k\n........\n........\n........\n........\n........\n...n....\n....K...",
            Color::White,
        );
        let before = g.snapshot();
        assert_eq!(g.submit_move(sq("e1"), sq("d2")), Err(MoveError::SelfCheck));
        assert_eq!(g.snapshot(), before);
    }

    #[test]
    fn valid_moves_filters_pinned_piece() {
        let g = game(
            "....r..k\n........\n........\n........\n........\n........\n....B...\n....K...",
            Color::White,
        );
        assert!(g.valid_moves(sq("e2")).is_empty());
        assert!(g.valid_moves(sq("h8")).is_empty());
        assert!(!g.valid_moves(sq("e1")).is_empty());
    }

    #[test]
    fn castling_sets_flags_and_reports_event() {
        let mut g = game(
            "r...k..r\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nR...K..R",
            Color::White,
        );
        assert!(g.valid_moves(sq("e1")).contains(&sq("c1")));

        let outcome = play(&mut g, "e1", "c1");
        assert_eq!(outcome.mv.special, Some(SpecialMove::CastleQueenside));
        let king = g.board().piece_at(sq("c1")).unwrap();
        let rook = g.board().piece_at(sq("d1")).unwrap();
        assert!(king.has_moved && rook.has_moved);
        assert!(matches!(
            outcome.events[..],
            [GameEvent::CastlePerformed { color: Color::White, .. }]
        ));
    }

    #[test]
    fn castling_out_of_check_is_rejected() {
        let mut g = game(
            "....r..k\n........\n........\n........\n........\n........\n........\n....K..R",
            Color::White,
        );
        assert!(g.is_in_check(Color::White));
        assert_eq!(g.submit_move(sq("e1"), sq("g1")), Err(MoveError::CastlingThroughCheck));
    }

    #[test]
    fn en_passant_window_is_one_ply() {
        let mut g = game(
            "....k...\n...p.p..\n........\n....P...\n........\n........\n........\n....K...",
            Color::Black,
        );
        play(&mut g, "d7", "d5");
        assert!(g.valid_moves(sq("e5")).contains(&sq("d6")));

        // White declines; black double-steps the other pawn
        play(&mut g, "e1", "e2");
        play(&mut g, "f7", "f5");
        let moves = g.valid_moves(sq("e5"));
        assert!(moves.contains(&sq("f6")));
        assert!(!moves.contains(&sq("d6")));

        let outcome = play(&mut g, "e5", "f6");
        assert!(g.board().piece_at(sq("f5")).is_none());
        assert!(matches!(outcome.events[..], [GameEvent::EnPassantCaptured { .. }]));
    }

    #[test]
    fn promotion_is_forced_to_queen() {
        let mut g = game(
            "....k...\n.P......\n........\n........\n........\n........\n........\n....K...",
            Color::White,
        );
        let outcome = play(&mut g, "b7", "b8");
        assert_eq!(g.board().piece_at(sq("b8")).unwrap().piece_type, PieceType::Queen);
        let promoted = GameEvent::PawnPromoted { color: Color::White, square: sq("b8") };
        assert!(outcome.events.contains(&promoted));
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        let outcome = play(&mut g, "d8", "h4");

        assert_eq!(outcome.status, GameStatus::Checkmate { winner: Color::Black });
        assert!(g.legal_moves().is_empty());
        assert_eq!(
            g.submit_move(sq("a2"), sq("a3")),
            Err(MoveError::GameOver(GameStatus::Checkmate { winner: Color::Black }))
        );
    }

    #[test]
    fn stalemate_is_detected() {
        // Black king on a8 boxed in by the queen, not in check
        let g = game(
            "k.......\n........\n.Q......\n........\n........\n........\n........\n.......K",
            Color::Black,
        );
        assert_eq!(g.status(), GameStatus::Stalemate);
        assert!(g.legal_moves().is_empty());
    }
}
