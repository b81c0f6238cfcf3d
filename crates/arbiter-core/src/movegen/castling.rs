//! Castling synthesis.
//!
//! Castles are not found by per-square pattern iteration; they are offered
//! when all of the gating conditions hold: the rights bit survives, king and
//! rook still stand on their home squares, the squares between them are
//! empty, and the king's start, passing, and destination squares are
//! unattacked. Attack status of *squares* is what gates — a pinned rook does
//! not block castling, which is a rules nuance, not an oversight.

use crate::board::Board;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::movegen::{MoveList, is_square_attacked};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// The king's home square for each color.
const fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

/// Append the castling moves available to the side to move.
pub(super) fn gen_castles(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    let home = king_home(us);

    for side in CastleSide::ALL {
        if !board.castling().has(us, side) {
            continue;
        }
        if board.piece_at(home) != Some(Piece::new(PieceKind::King, us)) {
            continue;
        }
        if board.piece_at(side.rook_from(us)) != Some(Piece::new(PieceKind::Rook, us)) {
            continue;
        }
        if side
            .between(us)
            .iter()
            .any(|&sq| board.piece_at(sq).is_some())
        {
            continue;
        }
        if side
            .king_path(us)
            .iter()
            .any(|&sq| is_square_attacked(board, sq, them))
        {
            continue;
        }
        list.push(Move::new(home, side.king_to(us)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::chess_move::Move;
    use crate::movegen::legal_moves;
    use crate::square::Square;

    const WHITE_OO: Move = Move::new(Square::E1, Square::G1);
    const WHITE_OOO: Move = Move::new(Square::E1, Square::C1);
    const BLACK_OO: Move = Move::new(Square::E8, Square::G8);
    const BLACK_OOO: Move = Move::new(Square::E8, Square::C8);

    fn castles(fen: &str) -> MoveList {
        let board: Board = fen.parse().unwrap();
        let mut list = MoveList::new();
        gen_castles(&board, &mut list);
        list
    }

    #[test]
    fn both_castles_available() {
        let list = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(list.len(), 2);
        assert!(list.contains(WHITE_OO));
        assert!(list.contains(WHITE_OOO));
    }

    #[test]
    fn black_castles_available() {
        let list = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert_eq!(list.len(), 2);
        assert!(list.contains(BLACK_OO));
        assert!(list.contains(BLACK_OOO));
    }

    #[test]
    fn rights_bit_gates_exactly_one_castle() {
        let list = castles("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1");
        assert_eq!(list.len(), 1);
        assert!(list.contains(WHITE_OOO));

        let list = castles("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1");
        assert_eq!(list.len(), 1);
        assert!(list.contains(WHITE_OO));
    }

    #[test]
    fn blocked_between_squares() {
        // Bishop on b1 blocks only the queenside castle.
        let list = castles("r3k2r/8/8/8/8/8/8/RB2K2R w KQkq - 0 1");
        assert_eq!(list.len(), 1);
        assert!(list.contains(WHITE_OO));
    }

    #[test]
    fn attacked_passing_square_blocks_kingside_only() {
        // The a6 bishop attacks f1 on the kingside path; the queenside path
        // (e1, d1, c1) is untouched.
        let list = castles("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(list.len(), 1);
        assert!(list.contains(WHITE_OOO));
    }

    #[test]
    fn king_in_check_blocks_both() {
        // Rook on e8 attacks the king's start square.
        let list = castles("4r3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(list.is_empty());
    }

    #[test]
    fn attacked_rook_does_not_block() {
        // The b7 bishop attacks h1 along the long diagonal but none of the
        // king-path squares: castling kingside stays available.
        let board: Board = "4k3/1b6/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        assert!(is_square_attacked(&board, Square::H1, Color::Black));
        let mut list = MoveList::new();
        gen_castles(&board, &mut list);
        assert!(list.contains(WHITE_OO));
    }

    #[test]
    fn displaced_rook_rejected_despite_rights_bit() {
        // Rights claim kingside, but the rook has wandered to g1.
        let list = castles("4k3/8/8/8/8/8/8/4K1R1 w K - 0 1");
        assert!(list.is_empty());
    }

    #[test]
    fn displaced_king_rejected_despite_rights_bit() {
        let list = castles("4k3/8/8/8/8/8/8/3K3R w K - 0 1");
        assert!(list.is_empty());
    }

    #[test]
    fn queenside_b_file_attack_does_not_gate() {
        // b1 is between rook and king but not on the king's path; an attack
        // on it alone must not prevent queenside castling.
        let board: Board = "4k3/8/8/8/8/8/p7/R3K3 w Q - 0 1".parse().unwrap();
        assert!(is_square_attacked(&board, Square::B1, Color::Black));
        let mut list = MoveList::new();
        gen_castles(&board, &mut list);
        assert!(list.contains(WHITE_OOO));
    }

    #[test]
    fn castles_appear_in_legal_moves() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let moves = legal_moves(&board);
        assert!(moves.contains(WHITE_OO));
        assert!(moves.contains(WHITE_OOO));
    }
}
