//! The game session state machine.

use std::fmt;

use tracing::{debug, info};

use arbiter_core::{
    Board, CastleRights, Color, FenError, Move, MoveList, Piece, Square, in_check,
    is_square_attacked, legal_moves,
};

use crate::terminal::TerminalState;

/// Errors from session operations. State is left unchanged when these are
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The game has already ended; no further moves may be played.
    #[error("the game is over")]
    GameOver,
    /// The move is not in the current legal-move set.
    #[error("illegal move: {mv}")]
    IllegalMove {
        /// The rejected move.
        mv: Move,
    },
    /// Undo was requested with only the initial position in the history.
    #[error("nothing to undo")]
    NothingToUndo,
    /// A draw claim whose threshold is not met (or the game is not ongoing).
    #[error("draw claim not permitted")]
    ClaimNotAllowed,
}

/// A chess game session: the position history plus everything the rules
/// derive from it.
///
/// Owns an append-only history of boards (one per ply, the initial position
/// included) and the parallel move list, and caches the current legal moves,
/// the repetition count of the current position, and the terminal state. The
/// caches are recomputed after every change by a single transition routine.
///
/// One `Game` serves one game; share across threads only behind external
/// synchronization.
pub struct Game {
    /// Position history; `boards.len() == moves.len() + 1` always holds.
    boards: Vec<Board>,
    /// Moves played, in order.
    moves: Vec<Move>,
    /// Legal moves in the current position.
    legal: MoveList,
    /// How many boards in the history are contextually equal to the current one.
    repetitions: u32,
    /// Current terminal state.
    terminal: TerminalState,
}

impl Game {
    /// Start a game from the standard initial position.
    pub fn new() -> Game {
        Game::with_board(Board::starting_position())
    }

    /// Start a game from a FEN position.
    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        Ok(Game::with_board(fen.parse()?))
    }

    fn with_board(board: Board) -> Game {
        let mut game = Game {
            boards: vec![board],
            moves: Vec::new(),
            legal: MoveList::new(),
            repetitions: 1,
            terminal: TerminalState::Ongoing,
        };
        game.recalculate();
        game
    }

    /// The current position (the tail of the history).
    pub fn board(&self) -> &Board {
        self.boards.last().expect("history always holds the initial board")
    }

    /// The legal moves available in the current position. Empty when the
    /// game has ended. Ordering is unspecified.
    pub fn legal_moves(&self) -> &[Move] {
        self.legal.as_slice()
    }

    /// The current terminal state.
    pub fn terminal_state(&self) -> TerminalState {
        self.terminal
    }

    /// Every position reached so far, the initial one first.
    pub fn board_history(&self) -> &[Board] {
        &self.boards
    }

    /// Every move played so far, in order.
    pub fn move_history(&self) -> &[Move] {
        &self.moves
    }

    /// The move history as space-separated UCI text, in play order.
    pub fn move_history_uci(&self) -> String {
        let ucis: Vec<String> = self.moves.iter().map(|mv| mv.to_uci()).collect();
        ucis.join(" ")
    }

    /// How many times the current position has occurred, the current
    /// occurrence included. Uses contextual equality (clocks ignored,
    /// phantom en-passant flags filtered).
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    /// Play a move. Rejected if the game is over or the move is not in the
    /// legal set (exact equality: a promotion must name its piece).
    pub fn play_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.terminal.is_terminal() {
            return Err(GameError::GameOver);
        }
        if !self.legal.contains(mv) {
            return Err(GameError::IllegalMove { mv });
        }

        let next = self.board().make_move(mv);
        self.boards.push(next);
        self.moves.push(mv);
        debug!(mv = %mv, ply = self.moves.len(), "move played");

        self.recalculate();
        Ok(())
    }

    /// Undo the last change.
    ///
    /// A player-claimed draw is un-claimed without un-playing anything; the
    /// session returns to the position the claim was made in. Otherwise the
    /// last move is removed. Fails when only the initial position remains.
    pub fn undo(&mut self) -> Result<(), GameError> {
        if self.boards.len() == 1 {
            return Err(GameError::NothingToUndo);
        }

        if self.terminal.is_claimed_draw() {
            debug!("draw claim withdrawn");
            self.terminal = TerminalState::Ongoing;
        } else {
            self.boards.pop();
            self.moves.pop();
            debug!(ply = self.moves.len(), "move undone");
        }

        self.recalculate();
        Ok(())
    }

    /// Return `true` if a 50-move-rule draw may currently be claimed.
    pub fn can_claim_draw_fifty(&self) -> bool {
        self.terminal == TerminalState::Ongoing && self.board().halfmove_clock() >= 100
    }

    /// Return `true` if a threefold-repetition draw may currently be claimed.
    pub fn can_claim_draw_threefold(&self) -> bool {
        self.terminal == TerminalState::Ongoing && self.repetitions >= 3
    }

    /// Claim a draw under the 50-move rule.
    pub fn claim_draw_fifty(&mut self) -> Result<(), GameError> {
        if !self.can_claim_draw_fifty() {
            return Err(GameError::ClaimNotAllowed);
        }
        self.terminal = TerminalState::DrawClaimed50MoveRule;
        info!(state = %self.terminal, "draw claimed");
        Ok(())
    }

    /// Claim a draw by threefold repetition.
    pub fn claim_draw_threefold(&mut self) -> Result<(), GameError> {
        if !self.can_claim_draw_threefold() {
            return Err(GameError::ClaimNotAllowed);
        }
        self.terminal = TerminalState::DrawClaimedThreefold;
        info!(state = %self.terminal, "draw claimed");
        Ok(())
    }

    // --- queries that mirror the current board ---

    /// The piece on a square of the current board.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board().piece_at(sq)
    }

    /// The side to move.
    pub fn side_to_move(&self) -> Color {
        self.board().side_to_move()
    }

    /// The current castling rights.
    pub fn castling(&self) -> CastleRights {
        self.board().castling()
    }

    /// The current en passant target square.
    pub fn en_passant(&self) -> Option<Square> {
        self.board().en_passant()
    }

    /// The current halfmove clock.
    pub fn halfmove_clock(&self) -> u16 {
        self.board().halfmove_clock()
    }

    /// The current fullmove number.
    pub fn fullmove_number(&self) -> u16 {
        self.board().fullmove_number()
    }

    /// Return `true` if the side to move is in check.
    pub fn in_check(&self) -> bool {
        in_check(self.board(), self.side_to_move())
    }

    /// Return `true` if the opponent of the side to move attacks `sq`.
    pub fn is_square_attacked(&self, sq: Square) -> bool {
        is_square_attacked(self.board(), sq, self.side_to_move().flip())
    }

    /// The FEN of the current position.
    pub fn fen(&self) -> String {
        self.board().to_string()
    }

    /// Recompute the cached fields from the current board and full history.
    ///
    /// Runs after every change: initial setup, move played, undo. Priority
    /// when moves remain: fivefold, then 75-move, then insufficient
    /// material; an already-claimed draw survives recomputation (only an
    /// explicit undo withdraws a claim).
    fn recalculate(&mut self) {
        let board = *self.board();

        self.repetitions = self
            .boards
            .iter()
            .filter(|past| board.eq_context(past))
            .count() as u32;

        self.legal = legal_moves(&board);

        if self.legal.is_empty() {
            self.terminal = if in_check(&board, board.side_to_move()) {
                TerminalState::Checkmate
            } else {
                TerminalState::DrawStalemate
            };
        } else if self.repetitions >= 5 {
            self.terminal = TerminalState::DrawFivefold;
        } else if board.halfmove_clock() >= 150 {
            self.terminal = TerminalState::Draw75MoveRule;
        } else if board.is_insufficient_material() {
            self.terminal = TerminalState::DrawInsufficientMaterial;
        } else if !self.terminal.is_claimed_draw() {
            self.terminal = TerminalState::Ongoing;
        }

        debug!(
            repetitions = self.repetitions,
            legal = self.legal.len(),
            state = %self.terminal,
            "session recalculated"
        );
        if self.terminal.is_terminal() {
            info!(state = %self.terminal, "game over");
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game(\"{}\", {} plies, {})",
            self.board(),
            self.moves.len(),
            self.terminal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, GameError};
    use crate::terminal::TerminalState;
    use arbiter_core::{Board, Move, Square};

    fn play(game: &mut Game, uci: &str) {
        let mv = Move::from_uci(uci).unwrap();
        game.play_move(mv).unwrap_or_else(|e| panic!("{uci}: {e}"));
    }

    #[test]
    fn new_game_is_ongoing() {
        let game = Game::new();
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.repetitions(), 1);
        assert_eq!(game.board_history().len(), 1);
        assert!(game.move_history().is_empty());
    }

    #[test]
    fn from_fen_propagates_errors() {
        assert!(Game::from_fen("not a fen").is_err());
        assert!(Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_ok());
    }

    #[test]
    fn history_invariant_holds() {
        let mut game = Game::new();
        play(&mut game, "e2e4");
        play(&mut game, "e7e5");
        assert_eq!(game.board_history().len(), game.move_history().len() + 1);
        assert_eq!(game.move_history_uci(), "e2e4 e7e5");
    }

    #[test]
    fn illegal_move_leaves_state_untouched() {
        let mut game = Game::new();
        let before_fen = game.fen();
        let result = game.play_move(Move::from_uci("e2e5").unwrap());
        assert_eq!(
            result,
            Err(GameError::IllegalMove {
                mv: Move::from_uci("e2e5").unwrap()
            })
        );
        assert_eq!(game.fen(), before_fen);
        assert_eq!(game.board_history().len(), 1);
    }

    #[test]
    fn promotion_requires_exact_move() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        // a7a8 without a promotion piece is not in the legal set.
        let bare = Move::new(Square::A7, Square::A8);
        assert!(game.play_move(bare).is_err());
        play(&mut game, "a7a8q");
    }

    #[test]
    fn undo_with_no_moves_fails() {
        let mut game = Game::new();
        assert_eq!(game.undo(), Err(GameError::NothingToUndo));
    }

    #[test]
    fn undo_symmetry_restores_initial_board() {
        let mut game = Game::new();
        for uci in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            play(&mut game, uci);
        }
        for _ in 0..4 {
            game.undo().unwrap();
        }
        assert_eq!(*game.board(), Board::starting_position());
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
        assert_eq!(game.board_history().len(), 1);
        assert!(game.move_history().is_empty());
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut game, uci);
        }
        assert_eq!(game.terminal_state(), TerminalState::Checkmate);
        assert!(game.legal_moves().is_empty());
        assert!(game.in_check());

        // No more moves once the game is over.
        let result = game.play_move(Move::from_uci("e2e4").unwrap());
        assert_eq!(result, Err(GameError::GameOver));
    }

    #[test]
    fn checkmate_is_undoable() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut game, uci);
        }
        game.undo().unwrap();
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
        assert!(!game.legal_moves().is_empty());
    }

    #[test]
    fn scripted_stalemate() {
        let mut game = Game::from_fen("k7/8/K7/8/8/8/8/2Q5 w - - 0 1").unwrap();
        play(&mut game, "c1c7");
        assert_eq!(game.terminal_state(), TerminalState::DrawStalemate);
        assert!(game.legal_moves().is_empty());
        assert!(!game.in_check());
    }

    #[test]
    fn threefold_is_claimable_not_automatic() {
        let mut game = Game::new();
        // Two full knight-shuffle cycles return to the initial position twice.
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut game, uci);
        }
        assert_eq!(game.repetitions(), 3);
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
        assert!(game.can_claim_draw_threefold());

        game.claim_draw_threefold().unwrap();
        assert_eq!(game.terminal_state(), TerminalState::DrawClaimedThreefold);
        assert_eq!(
            game.play_move(Move::from_uci("e2e4").unwrap()),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn threefold_claim_rejected_below_threshold() {
        let mut game = Game::new();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut game, uci);
        }
        assert_eq!(game.repetitions(), 2);
        assert!(!game.can_claim_draw_threefold());
        assert_eq!(game.claim_draw_threefold(), Err(GameError::ClaimNotAllowed));
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
    }

    #[test]
    fn undo_withdraws_claim_without_unplaying() {
        let mut game = Game::new();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
            play(&mut game, uci);
        }
        game.claim_draw_threefold().unwrap();
        let plies = game.move_history().len();

        game.undo().unwrap();
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
        assert_eq!(game.move_history().len(), plies, "claim undo keeps the move");

        // A second undo now removes an actual move.
        game.undo().unwrap();
        assert_eq!(game.move_history().len(), plies - 1);
    }

    #[test]
    fn claim_on_initial_position_survives_rejected_undo() {
        // A claim made with nothing played cannot be withdrawn by undo,
        // because there is nothing to undo.
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 60").unwrap();
        game.claim_draw_fifty().unwrap();
        assert_eq!(game.undo(), Err(GameError::NothingToUndo));
        assert_eq!(game.terminal_state(), TerminalState::DrawClaimed50MoveRule);
    }

    #[test]
    fn fivefold_is_automatic() {
        let mut game = Game::new();
        for _ in 0..4 {
            for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                play(&mut game, uci);
            }
        }
        assert_eq!(game.repetitions(), 5);
        assert_eq!(game.terminal_state(), TerminalState::DrawFivefold);
    }

    #[test]
    fn phantom_en_passant_counts_for_repetition() {
        let mut game = Game::new();
        // 1.e4 sets an en passant target no black pawn can use; the position
        // after each later knight shuffle must still count as a repeat.
        play(&mut game, "e2e4");
        for uci in ["g8f6", "g1f3", "f6g8", "f3g1"] {
            play(&mut game, uci);
        }
        // Position after 1.e4 (with phantom ep) now recurs with no ep flag.
        assert_eq!(game.repetitions(), 2);
        for uci in ["g8f6", "g1f3", "f6g8", "f3g1"] {
            play(&mut game, uci);
        }
        assert_eq!(game.repetitions(), 3);
        assert!(game.can_claim_draw_threefold());
    }

    #[test]
    fn fifty_move_claim_needs_clock_100() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 70").unwrap();
        assert!(!game.can_claim_draw_fifty());
        assert_eq!(game.claim_draw_fifty(), Err(GameError::ClaimNotAllowed));

        play(&mut game, "a1a2");
        assert_eq!(game.halfmove_clock(), 100);
        assert_eq!(game.terminal_state(), TerminalState::Ongoing, "claimable, not automatic");
        assert!(game.can_claim_draw_fifty());
        game.claim_draw_fifty().unwrap();
        assert_eq!(game.terminal_state(), TerminalState::DrawClaimed50MoveRule);
    }

    #[test]
    fn seventy_five_move_rule_is_automatic() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 90").unwrap();
        assert_eq!(game.terminal_state(), TerminalState::Ongoing);
        play(&mut game, "a1a2");
        assert_eq!(game.halfmove_clock(), 150);
        assert_eq!(game.terminal_state(), TerminalState::Draw75MoveRule);
    }

    #[test]
    fn insufficient_material_at_setup() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            game.terminal_state(),
            TerminalState::DrawInsufficientMaterial
        );
    }

    #[test]
    fn capture_into_insufficient_material_ends_game() {
        // Kxh2 removes the last piece besides the kings.
        let mut game = Game::from_fen("4k3/8/8/8/8/8/7b/6K1 w - - 0 1").unwrap();
        play(&mut game, "g1h2");
        assert_eq!(
            game.terminal_state(),
            TerminalState::DrawInsufficientMaterial
        );
    }

    #[test]
    fn board_queries_mirror_current_position() {
        let mut game = Game::new();
        play(&mut game, "e2e4");
        assert_eq!(game.en_passant(), Some(Square::E3));
        assert_eq!(game.fullmove_number(), 1);
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(
            game.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }
}
