//! The interactive console: a synchronous read-dispatch loop over stdin.
//!
//! Every operation the session offers runs to completion immediately, so
//! there is no worker thread or event channel here: one loop reads a line,
//! executes it, and prints the response.

use std::io::{self, BufRead};

use tracing::{info, warn};

use arbiter_core::{divide, perft};
use arbiter_game::{Game, GameError};

use crate::command::{Command, parse_command};
use crate::error::UciError;

/// A console session wrapping one [`Game`].
pub struct Console {
    game: Game,
}

impl Console {
    /// Create a console with a game at the starting position.
    pub fn new() -> Console {
        Console { game: Game::new() }
    }

    /// Read commands from stdin until `quit` or end of input.
    pub fn run(&mut self) -> Result<(), UciError> {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(cmd) => cmd,
                Err(e) => {
                    warn!(error = %e, "rejected command");
                    println!("error: {e}");
                    continue;
                }
            };

            if matches!(command, Command::Quit) {
                break;
            }
            for response in self.handle(command) {
                println!("{response}");
            }
        }
        info!("arbiter shutting down");
        Ok(())
    }

    /// Execute one command against the session, returning the response lines.
    pub fn handle(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Position(game) => {
                self.game = *game;
                vec![self.game.fen()]
            }
            Command::Play(mv) => match self.game.play_move(mv) {
                Ok(()) => vec![self.game.fen()],
                Err(e) => vec![format!("error: {e}")],
            },
            Command::Undo => match self.game.undo() {
                Ok(()) => vec![self.game.fen()],
                Err(e) => vec![format!("error: {e}")],
            },
            Command::ClaimFifty => self.claim(Game::claim_draw_fifty),
            Command::ClaimThreefold => self.claim(Game::claim_draw_threefold),
            Command::Legal => {
                let ucis: Vec<String> =
                    self.game.legal_moves().iter().map(|mv| mv.to_uci()).collect();
                vec![ucis.join(" ")]
            }
            Command::History => vec![self.game.move_history_uci()],
            Command::Fen => vec![self.game.fen()],
            Command::Display => vec![format!("{}", self.game.board().pretty())],
            Command::Status => self.status(),
            Command::Perft(depth) => {
                let mut lines: Vec<String> = divide(self.game.board(), depth)
                    .into_iter()
                    .map(|(mv, nodes)| format!("{mv}: {nodes}"))
                    .collect();
                lines.push(format!("nodes: {}", perft(self.game.board(), depth)));
                lines
            }
            Command::Quit => Vec::new(),
            Command::Unknown(cmd) => {
                if !cmd.is_empty() {
                    warn!(cmd = %cmd, "unknown command ignored");
                }
                Vec::new()
            }
        }
    }

    fn claim(&mut self, op: fn(&mut Game) -> Result<(), GameError>) -> Vec<String> {
        match op(&mut self.game) {
            Ok(()) => vec![format!("{}", self.game.terminal_state())],
            Err(e) => vec![format!("error: {e}")],
        }
    }

    fn status(&self) -> Vec<String> {
        let game = &self.game;
        vec![
            format!("state: {}", game.terminal_state()),
            format!("side to move: {}", game.side_to_move()),
            format!("in check: {}", game.in_check()),
            format!("halfmove clock: {}", game.halfmove_clock()),
            format!("repetitions: {}", game.repetitions()),
            format!("legal moves: {}", game.legal_moves().len()),
        ]
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
