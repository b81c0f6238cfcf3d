//! Console command parsing.

use arbiter_core::Move;
use arbiter_game::Game;

use crate::error::UciError;

/// A parsed console command.
#[derive(Debug)]
pub enum Command {
    /// `position startpos|fen <fen> [moves <uci>...]` -- set up a fresh session.
    Position(Box<Game>),
    /// `play <uci>` -- play one move in the current session.
    Play(Move),
    /// `undo` -- undo the last move (or withdraw a draw claim).
    Undo,
    /// `claim fifty` -- claim a 50-move-rule draw.
    ClaimFifty,
    /// `claim threefold` -- claim a threefold-repetition draw.
    ClaimThreefold,
    /// `legal` -- list the legal moves.
    Legal,
    /// `history` -- print the move history in UCI form.
    History,
    /// `fen` -- print the current position as FEN.
    Fen,
    /// `d` -- draw the board.
    Display,
    /// `status` -- print terminal state, side to move, and counters.
    Status,
    /// `perft <depth>` -- count leaf nodes for the current position.
    Perft(usize),
    /// `quit` -- exit.
    Quit,
    /// Unrecognized command (ignored with a warning).
    Unknown(String),
}

/// Parse a single line of console input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "position" => parse_position(&tokens[1..]),
        "play" | "move" => parse_play(&tokens[1..]),
        "undo" => Ok(Command::Undo),
        "claim" => parse_claim(&tokens[1..]),
        "legal" => Ok(Command::Legal),
        "history" => Ok(Command::History),
        "fen" => Ok(Command::Fen),
        "d" | "display" => Ok(Command::Display),
        "status" => Ok(Command::Status),
        "perft" => parse_perft(&tokens[1..]),
        "quit" => Ok(Command::Quit),
        _ => Ok(Command::Unknown(tokens[0].to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
///
/// The moves are validated against the session: an illegal move rejects the
/// whole command and no session replacement happens.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.is_empty() {
        return Err(UciError::MalformedPosition);
    }

    let (mut game, rest) = if tokens[0] == "startpos" {
        (Game::new(), &tokens[1..])
    } else if tokens[0] == "fen" {
        // FEN is 6 space-separated fields
        if tokens.len() < 7 {
            return Err(UciError::InvalidFen {
                fen: tokens[1..].join(" "),
            });
        }
        let fen = tokens[1..7].join(" ");
        let game = Game::from_fen(&fen).map_err(|_| UciError::InvalidFen { fen: fen.clone() })?;
        (game, &tokens[7..])
    } else {
        return Err(UciError::MalformedPosition);
    };

    // Apply moves if present: "moves e2e4 d7d5 ..."
    if !rest.is_empty() && rest[0] == "moves" {
        for uci_str in &rest[1..] {
            let mv = Move::from_uci(uci_str).ok_or_else(|| UciError::InvalidMove {
                uci_move: uci_str.to_string(),
            })?;
            game.play_move(mv).map_err(|_| UciError::InvalidMove {
                uci_move: uci_str.to_string(),
            })?;
        }
    }

    Ok(Command::Position(Box::new(game)))
}

fn parse_play(tokens: &[&str]) -> Result<Command, UciError> {
    let Some(&uci_str) = tokens.first() else {
        return Err(UciError::InvalidMove {
            uci_move: String::new(),
        });
    };
    let mv = Move::from_uci(uci_str).ok_or_else(|| UciError::InvalidMove {
        uci_move: uci_str.to_string(),
    })?;
    Ok(Command::Play(mv))
}

fn parse_claim(tokens: &[&str]) -> Result<Command, UciError> {
    match tokens.first() {
        Some(&"fifty") | Some(&"50") => Ok(Command::ClaimFifty),
        Some(&"threefold") => Ok(Command::ClaimThreefold),
        _ => Err(UciError::MalformedClaim),
    }
}

fn parse_perft(tokens: &[&str]) -> Result<Command, UciError> {
    let value = tokens.first().copied().unwrap_or("");
    let depth = value.parse::<usize>().map_err(|_| UciError::InvalidDepth {
        value: value.to_string(),
    })?;
    Ok(Command::Perft(depth))
}
