//! Error types for the rules layer.
//!
//! Two families live here. [`PositionError`] covers text that cannot be
//! read as a square or move (it only ever comes from the wire).
//! [`RulesError`] covers a well-formed request that the game refuses:
//! wrong turn, empty source square, illegal move, and so on. Neither is
//! fatal; both are reported back to the client that caused them.

use crate::Color;

/// A square or move written in algebraic notation could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// Not a file a–h followed by a rank 1–8.
    #[error("invalid square {0:?}: expected a file a-h followed by a rank 1-8")]
    InvalidSquare(String),

    /// Not two squares optionally followed by a promotion letter.
    #[error("invalid move {0:?}: expected e.g. \"e2e4\" or \"e7e8q\"")]
    InvalidMove(String),
}

/// A move or resignation was refused by the game.
///
/// The state that produced this error is left exactly as it was: a
/// rejected command never mutates the board, the turn or the status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// It is the other side's move, or the game is already over.
    #[error("it is not {0}'s turn")]
    NotYourTurn(Color),

    /// The source square of the move is empty.
    #[error("there is no piece on {0}")]
    NoPieceAtSource(crate::Position),

    /// The piece on the source square belongs to the opponent.
    #[error("the piece on {0} does not belong to {1}")]
    WrongOwner(crate::Position, Color),

    /// The move is not among the legal moves of that piece.
    #[error("illegal move {0}")]
    IllegalMove(crate::Move),

    /// Resigning after the game has ended.
    #[error("the game is already over")]
    MatchAlreadyOver,
}
