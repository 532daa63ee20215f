use std::fmt;

use crate::{piece::{Color, PieceView}, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub special: Option<SpecialMove>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialMove {
    CastleKingside,
    CastleQueenside,
    EnPassantCapture,
    // Always to a queen
    Promotion,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to, special: None }
    }

    pub fn is_castle(&self) -> bool {
        matches!(
            self.special,
            Some(SpecialMove::CastleKingside | SpecialMove::CastleQueenside)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.special == Some(SpecialMove::Promotion) {
            write!(f, "q")?;
        }
        Ok(())
    }
}

/// Side effects of an applied move that the presentation layer may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PieceCaptured {
        captured: PieceView,
    },
    CastlePerformed {
        color: Color,
        side: SpecialMove,
        rook_from: Square,
        rook_to: Square,
    },
    EnPassantCaptured {
        captured: PieceView,
        landing: Square,
    },
    PawnPromoted {
        color: Color,
        square: Square,
    },
}
