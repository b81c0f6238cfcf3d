//! FEN string parsing and serialization for [`Board`].

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        // Parse piece placement
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount {
                found: ranks.len(),
            });
        }

        let mut squares = [None; Square::COUNT];

        for (rank_index, rank_str) in ranks.iter().enumerate() {
            // FEN ranks run from 8 down to 1.
            let rank = 8 - rank_index as u8;
            let mut file: u8 = 1;
            let mut prev_was_digit = false;

            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    // Consecutive digits would make the rendering ambiguous
                    // (e.g. "44" for "8"), breaking the byte-exact roundtrip.
                    if !(1..=8).contains(&run) || prev_was_digit {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file += run as u8;
                    prev_was_digit = true;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or(FenError::InvalidPieceChar { character: c })?;

                    let Some(sq) = Square::from_coords(file, rank) else {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: file as usize,
                        });
                    };
                    squares[sq.index()] = Some(piece);
                    file += 1;
                    prev_was_digit = false;
                }
            }

            if file != 9 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: file as usize - 1,
                });
            }
        }

        // Parse active color
        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        // Parse castling rights
        let castling = CastleRights::from_fen(fields[2])?;

        // Parse en passant
        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(fields[3]).ok_or_else(|| FenError::InvalidEnPassant {
                    found: fields[3].to_string(),
                })?,
            )
        };

        // Parse halfmove clock
        let halfmove_clock =
            fields[4]
                .parse::<u16>()
                .map_err(|_| FenError::InvalidMoveCounter {
                    field: "halfmove clock",
                    found: fields[4].to_string(),
                })?;

        // Parse fullmove number
        let fullmove_number =
            fields[5]
                .parse::<u16>()
                .map_err(|_| FenError::InvalidMoveCounter {
                    field: "fullmove number",
                    found: fields[5].to_string(),
                })?;

        Ok(Board::from_raw(
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Piece placement, rank 8 first, empty runs as digits.
        for rank in (1u8..=8).rev() {
            let mut empty_run = 0u8;

            for file in 1u8..=8 {
                let sq = Square::from_coords(file, rank).expect("in-bounds coordinates");
                match self.piece_at(sq) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => {
                        empty_run += 1;
                    }
                }
            }

            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }

            if rank > 1 {
                write!(f, "/")?;
            }
        }

        // Side to move
        write!(f, " {}", self.side_to_move())?;

        // Castling
        write!(f, " {}", self.castling())?;

        // En passant
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }

        // Move counters
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
