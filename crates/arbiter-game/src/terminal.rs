//! Game termination states.

use std::fmt;

/// The outcome state of a game session.
///
/// `Ongoing` is the sole non-terminal state; every other variant ends the
/// game. The two *claimed* draws are reached only by explicit player action
/// once the matching threshold is met; the rest are adjudicated
/// automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    /// The game continues; moves may be played.
    Ongoing,
    /// The side to move has no legal moves and is in check.
    Checkmate,
    /// The side to move has no legal moves and is not in check.
    DrawStalemate,
    /// A player claimed the 50-move rule (halfmove clock reached 100).
    DrawClaimed50MoveRule,
    /// Automatic draw: the halfmove clock reached 150.
    Draw75MoveRule,
    /// A player claimed threefold repetition.
    DrawClaimedThreefold,
    /// Automatic draw: the position occurred five times.
    DrawFivefold,
    /// Automatic draw: neither side retains mating material.
    DrawInsufficientMaterial,
}

impl TerminalState {
    /// Return `true` for every state except `Ongoing`.
    pub fn is_terminal(self) -> bool {
        self != TerminalState::Ongoing
    }

    /// Return `true` for the two player-claimed draw states.
    pub fn is_claimed_draw(self) -> bool {
        matches!(
            self,
            TerminalState::DrawClaimed50MoveRule | TerminalState::DrawClaimedThreefold
        )
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminalState::Ongoing => "ongoing",
            TerminalState::Checkmate => "checkmate",
            TerminalState::DrawStalemate => "draw by stalemate",
            TerminalState::DrawClaimed50MoveRule => "draw by 50-move rule (claimed)",
            TerminalState::Draw75MoveRule => "draw by 75-move rule",
            TerminalState::DrawClaimedThreefold => "draw by threefold repetition (claimed)",
            TerminalState::DrawFivefold => "draw by fivefold repetition",
            TerminalState::DrawInsufficientMaterial => "draw by insufficient material",
        };
        write!(f, "{text}")
    }
}
