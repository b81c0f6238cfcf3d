//! Console protocol errors.

/// Errors that can occur while handling console commands.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing its `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// Failed to parse a FEN string.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// A move string could not be parsed or is not legal here.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The UCI move string that was rejected.
        uci_move: String,
    },

    /// The `claim` command named neither `fifty` nor `threefold`.
    #[error("malformed claim command: expected fifty or threefold")]
    MalformedClaim,

    /// The `perft` depth is missing or not a number.
    #[error("invalid perft depth: {value}")]
    InvalidDepth {
        /// The depth string that failed to parse.
        value: String,
    },

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
