//! Pawn move generation: advances, captures, en passant, and promotion.

use crate::board::Board;
use crate::chess_move::{Move, PromotionPiece};
use crate::color::Color;
use crate::movegen::MoveList;
use crate::square::Square;

/// The rank a pawn of this color starts on (and may double-push from).
const fn start_rank(color: Color) -> u8 {
    match color {
        Color::White => 2,
        Color::Black => 7,
    }
}

/// Push a pawn move, expanding into the four promotion moves when the
/// destination is the far rank.
fn push_pawn_move(list: &mut MoveList, from: Square, to: Square) {
    if to.rank() == 1 || to.rank() == 8 {
        for promo in PromotionPiece::ALL {
            list.push(Move::new_promotion(from, to, promo));
        }
    } else {
        list.push(Move::new(from, to));
    }
}

/// Generate pseudo-legal pawn moves from `from`.
pub(super) fn gen_pawn_moves(board: &Board, from: Square, color: Color, list: &mut MoveList) {
    let dr = color.forward();

    // Forward moves need empty squares; the double push additionally
    // requires the pawn to still be on its starting rank.
    if let Some(one) = from.offset(0, dr)
        && board.piece_at(one).is_none()
    {
        push_pawn_move(list, from, one);

        if from.rank() == start_rank(color)
            && let Some(two) = one.offset(0, dr)
            && board.piece_at(two).is_none()
        {
            list.push(Move::new(from, two));
        }
    }

    // Diagonal captures, including onto the en passant target square.
    for df in [-1i8, 1] {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        let enemy_there = board
            .piece_at(to)
            .is_some_and(|piece| piece.color() != color);
        if enemy_there || board.en_passant() == Some(to) {
            push_pawn_move(list, from, to);
        }
    }
}

/// Return `true` if a pawn of `color` on `from` attacks `target`.
///
/// Distinct from the move generator: a pawn attacks its two forward
/// diagonals whether or not a capturable piece stands there, and never
/// attacks the squares it merely advances to.
pub(super) fn pawn_attacks(color: Color, from: Square, target: Square) -> bool {
    let dr = color.forward();
    from.offset(-1, dr) == Some(target) || from.offset(1, dr) == Some(target)
}
