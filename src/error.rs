//! Errors reported by the library.
//!
//! Low-level parsers (squares, pieces, castling rights) report
//! [`anyhow::Error`] with a human-readable cause. Public entry points wrap
//! these into [`Error`] so that callers can match on the failure kind.

use crate::chess::game::GameState;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure kinds of the public API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not valid FEN or describes an impossible position. The
    /// wrapped error explains the cause.
    #[error("malformed FEN: {0:#}")]
    MalformedFen(anyhow::Error),
    /// The move is not legal in the position, or the notation could not be
    /// understood as a move at all.
    #[error("illegal move {notation} in position {fen}")]
    IllegalMove {
        /// The move as it was given.
        notation: String,
        /// The position the move was tried in.
        fen: String,
    },
    /// The SAN string matches zero or several legal moves.
    #[error("SAN {san} matches {candidates} legal moves, expected exactly one")]
    AmbiguousOrIllegalSan {
        /// The input as it was given.
        san: String,
        /// Number of legal moves matching the input.
        candidates: usize,
    },
    /// Undo at the start of the game or redo at its tip.
    #[error("no history to navigate")]
    NoHistory,
    /// A move was attempted after the game has ended.
    #[error("game is over: {0}")]
    GameOver(GameState),
    /// A draw claim was made while no draw condition holds.
    #[error("no draw to claim in state {0}")]
    NoDrawToClaim(GameState),
}
