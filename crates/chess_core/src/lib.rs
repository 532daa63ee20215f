// Core chess game logic modules
pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod rules;
pub mod snapshot;
pub mod square;

// Re-export main types for convenience
pub use board::Board;
pub use error::{MoveError, SnapshotError};
pub use game::{Game, GameStatus, MoveOutcome};
pub use moves::{GameEvent, Move, SpecialMove};
pub use piece::{Color, Piece, PieceType, PieceView};
pub use snapshot::Snapshot;
pub use square::Square;
