use chess_core::{Color, Game, Move, MoveError, MoveOutcome};
use log::{debug, warn};

use crate::{
    analysis::analyse_root_moves,
    search::{search_with_stats, DEFAULT_SEARCH_DEPTH, INFINITY},
};

const MIN_DEPTH: u8 = 1;
const MAX_DEPTH: u8 = 4;  // Every node copies the board, keep this shallow

/// Automated opponent: a fixed-depth search over the live game's snapshot.
#[derive(Debug, Clone)]
pub struct ChessAI {
    depth: u8,
}

impl ChessAI {
    pub fn new(depth: u8) -> Self {
        ChessAI {
            depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Picks a move for the side to move, or `None` once the game is over.
    ///
    /// The search runs on a snapshot, which forgets castling rights and en
    /// passant eligibility. If its choice is not legal in the live position
    /// every live legal move is scored on its own and the best one is played.
    pub fn choose_move(&self, game: &Game) -> Option<Move> {
        let legal = game.legal_moves();
        if legal.is_empty() {
            return None;
        }

        let maximizing = game.side_to_move() == Color::White;
        let outcome =
            search_with_stats(&game.snapshot(), self.depth, maximizing, -INFINITY, INFINITY);
        debug!(
            "depth {} search for {:?}: score {}, {} nodes, best {:?}",
            self.depth,
            game.side_to_move(),
            outcome.score,
            outcome.nodes,
            outcome.best_move.map(|mv| mv.to_string())
        );

        match outcome.best_move {
            Some(mv) if legal.contains(&mv) => Some(mv),
            Some(mv) => {
                warn!("search chose {} which is not playable in the live position", mv);
                self.best_live_move(game)
            }
            None => self.best_live_move(game),
        }
    }

    fn best_live_move(&self, game: &Game) -> Option<Move> {
        analyse_root_moves(game, self.depth)
            .first()
            .map(|&(mv, _)| mv)
    }

    /// Chooses and submits a move. `Ok(None)` means there was nothing to play.
    pub fn play(&self, game: &mut Game) -> Result<Option<MoveOutcome>, MoveError> {
        match self.choose_move(game) {
            Some(mv) => game.submit_move(mv.from, mv.to).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for ChessAI {
    fn default() -> Self {
        ChessAI::new(DEFAULT_SEARCH_DEPTH)
    }
}
