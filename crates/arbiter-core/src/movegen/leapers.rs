//! Leaper move generation: pieces that jump to fixed offsets.

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::movegen::MoveList;
use crate::square::Square;

/// Knight jump offsets as (file, rank) deltas.
pub(super) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King step offsets: one square in every direction.
pub(super) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Push every in-bounds leap that does not land on one of our own pieces.
pub(super) fn gen_leaper_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    list: &mut MoveList,
) {
    for &(df, dr) in offsets {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        let capturable = match board.piece_at(to) {
            None => true,
            Some(piece) => piece.color() != color,
        };
        if capturable {
            list.push(Move::new(from, to));
        }
    }
}

/// Return `true` if a leaper on `from` covers `target`. Occupancy-independent.
pub(super) fn leaper_reaches(from: Square, target: Square, offsets: &[(i8, i8)]) -> bool {
    offsets
        .iter()
        .any(|&(df, dr)| from.offset(df, dr) == Some(target))
}
