use crate::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns of this color advance in.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Uppercase letter used by the snapshot encoding.
    pub fn symbol(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Pawn => 'P',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            'P' => Some(PieceType::Pawn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Square,
    // Castling rights, King and Rook only
    pub has_moved: bool,
    // Set for exactly one ply after a pawn double step
    pub en_passant_eligible: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Square) -> Self {
        Self {
            piece_type,
            color,
            position,
            has_moved: false,
            en_passant_eligible: false,
        }
    }

    pub fn symbol(&self) -> char {
        let symbol = self.piece_type.symbol();
        match self.color {
            Color::White => symbol,
            Color::Black => symbol.to_ascii_lowercase(),
        }
    }

    pub fn from_symbol(symbol: char, position: Square) -> Option<Self> {
        let piece_type = PieceType::from_symbol(symbol)?;
        let color = if symbol.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self::new(piece_type, color, position))
    }
}

/// Read-only view of a piece handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceView {
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Square,
}

impl From<&Piece> for PieceView {
    fn from(piece: &Piece) -> Self {
        Self {
            piece_type: piece.piece_type,
            color: piece.color,
            position: piece.position,
        }
    }
}
