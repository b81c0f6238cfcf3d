//! Castling rights stored as a 4-bit field, plus the castle geometry.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Which side of the board to castle toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// Both castle sides.
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// The king's destination square for this castle.
    pub const fn king_to(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::KingSide, Color::White) => Square::G1,
            (CastleSide::QueenSide, Color::White) => Square::C1,
            (CastleSide::KingSide, Color::Black) => Square::G8,
            (CastleSide::QueenSide, Color::Black) => Square::C8,
        }
    }

    /// The home square of the rook that participates in this castle.
    pub const fn rook_from(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::KingSide, Color::White) => Square::H1,
            (CastleSide::QueenSide, Color::White) => Square::A1,
            (CastleSide::KingSide, Color::Black) => Square::H8,
            (CastleSide::QueenSide, Color::Black) => Square::A8,
        }
    }

    /// The rook's destination square for this castle.
    pub const fn rook_to(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::KingSide, Color::White) => Square::F1,
            (CastleSide::QueenSide, Color::White) => Square::D1,
            (CastleSide::KingSide, Color::Black) => Square::F8,
            (CastleSide::QueenSide, Color::Black) => Square::D8,
        }
    }

    /// The squares strictly between king and rook, which must all be empty.
    pub const fn between(self, color: Color) -> &'static [Square] {
        match (self, color) {
            (CastleSide::KingSide, Color::White) => &[Square::F1, Square::G1],
            (CastleSide::QueenSide, Color::White) => &[Square::B1, Square::C1, Square::D1],
            (CastleSide::KingSide, Color::Black) => &[Square::F8, Square::G8],
            (CastleSide::QueenSide, Color::Black) => &[Square::B8, Square::C8, Square::D8],
        }
    }

    /// The king's start, passing, and destination squares, all of which must
    /// be unattacked for the castle to be offered.
    pub const fn king_path(self, color: Color) -> [Square; 3] {
        match (self, color) {
            (CastleSide::KingSide, Color::White) => [Square::E1, Square::F1, Square::G1],
            (CastleSide::QueenSide, Color::White) => [Square::E1, Square::D1, Square::C1],
            (CastleSide::KingSide, Color::Black) => [Square::E8, Square::F8, Square::G8],
            (CastleSide::QueenSide, Color::Black) => [Square::E8, Square::D8, Square::C8],
        }
    }
}

/// Castling rights encoded as a 4-bit field: bit 0 = WK, 1 = WQ, 2 = BK, 3 = BQ.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    /// No castling rights.
    pub const NONE: CastleRights = CastleRights(0);
    /// All castling rights.
    pub const ALL: CastleRights = CastleRights(0b1111);

    /// White king-side castling.
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    /// White queen-side castling.
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    /// Black king-side castling.
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    /// Black queen-side castling.
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    /// Both white castling rights.
    pub const WHITE_BOTH: CastleRights = CastleRights(0b0011);
    /// Both black castling rights.
    pub const BLACK_BOTH: CastleRights = CastleRights(0b1100);

    /// Return `true` if no castling rights remain.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Return new rights with all bits from `other` added.
    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    /// Return new rights with all bits from `other` removed.
    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// Check whether a specific color and side can castle.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        (self.0 & Self::flag(color, side).0) != 0
    }

    /// Remove all castling rights for the given color.
    #[inline]
    pub const fn remove_color(self, color: Color) -> CastleRights {
        match color {
            Color::White => self.remove(Self::WHITE_BOTH),
            Color::Black => self.remove(Self::BLACK_BOTH),
        }
    }

    /// Return the single-bit flag for a color and side.
    #[inline]
    const fn flag(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => Self::WHITE_KING,
            (Color::White, CastleSide::QueenSide) => Self::WHITE_QUEEN,
            (Color::Black, CastleSide::KingSide) => Self::BLACK_KING,
            (Color::Black, CastleSide::QueenSide) => Self::BLACK_QUEEN,
        }
    }

    /// Parse castling rights from the FEN castling field (e.g. "KQkq", "Kq", "-").
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }

        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            let flag = match c {
                'K' => Self::WHITE_KING,
                'Q' => Self::WHITE_QUEEN,
                'k' => Self::BLACK_KING,
                'q' => Self::BLACK_QUEEN,
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            rights = rights.insert(flag);
        }
        Ok(rights)
    }

    /// Serialize to the FEN castling field, letters in fixed `KQkq` order.
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }

        let mut s = String::with_capacity(4);
        if self.contains(Self::WHITE_KING) {
            s.push('K');
        }
        if self.contains(Self::WHITE_QUEEN) {
            s.push('Q');
        }
        if self.contains(Self::BLACK_KING) {
            s.push('k');
        }
        if self.contains(Self::BLACK_QUEEN) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({})", self.to_fen())
    }
}
