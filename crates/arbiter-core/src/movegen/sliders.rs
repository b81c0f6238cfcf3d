//! Rider move generation: pieces that slide along direction rays.

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::movegen::MoveList;
use crate::square::Square;

/// Bishop ray directions as (file, rank) deltas.
pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Rook ray directions.
pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Queen ray directions: the union of rook and bishop rays.
pub(super) const QUEEN_DIRS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Walk each ray until the board edge or a piece; enemy pieces are included
/// as captures, own pieces stop the ray short.
pub(super) fn gen_rider_moves(
    board: &Board,
    from: Square,
    color: Color,
    dirs: &[(i8, i8)],
    list: &mut MoveList,
) {
    for &(df, dr) in dirs {
        let mut sq = from;
        while let Some(next) = sq.offset(df, dr) {
            match board.piece_at(next) {
                None => {
                    list.push(Move::new(from, next));
                    sq = next;
                }
                Some(piece) => {
                    if piece.color() != color {
                        list.push(Move::new(from, next));
                    }
                    break;
                }
            }
        }
    }
}

/// Return `true` if a rider on `from` covers `target` given the current
/// occupancy. The first occupied square along a ray is covered; anything
/// beyond it is shadowed.
pub(super) fn rider_reaches(
    board: &Board,
    from: Square,
    target: Square,
    dirs: &[(i8, i8)],
) -> bool {
    for &(df, dr) in dirs {
        let mut sq = from;
        while let Some(next) = sq.offset(df, dr) {
            if next == target {
                return true;
            }
            if board.piece_at(next).is_some() {
                break;
            }
            sq = next;
        }
    }
    false
}
