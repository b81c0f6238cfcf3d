//! Game session layer: history, repetition tracking, and termination.

mod game;
mod terminal;

pub use game::{Game, GameError};
pub use terminal::TerminalState;
