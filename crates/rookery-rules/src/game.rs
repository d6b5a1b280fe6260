//! Game state machine: whose turn it is, the board, and how it ended.
//!
//! ```text
//!   InProgress ⇄ Check ──→ Checkmate | Stalemate
//!        └──────┴────────→ Resigned
//! ```
//!
//! `InProgress` and `Check` are "live": moves are accepted and the turn
//! alternates. The other three are terminal. `apply_move` and `resign`
//! are the only ways to change a `GameState`, and both leave it
//! untouched when they return an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{engine, Board, Color, Move, Position, RulesError};

/// Where the game stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
    Resigned,
}

impl GameStatus {
    /// Returns `true` once no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate | Self::Resigned)
    }
}

/// The authoritative state of one game.
///
/// Serializes as
/// `{ "board": [...], "turn": "WHITE", "status": "IN_PROGRESS" }`, plus
/// `"resignedBy"` once somebody resigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    turn: Color,
    status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resigned_by: Option<Color>,
}

impl GameState {
    /// A new game: standard setup, White to move.
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            turn: Color::White,
            status: GameStatus::InProgress,
            resigned_by: None,
        }
    }

    /// A game continuing from an arbitrary position with `turn` to move.
    ///
    /// The status is computed from the position, so a board that is
    /// already mate comes back as `Checkmate`.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let in_check = engine::is_in_check(&board, turn);
        let status = engine::status(&board, turn, in_check);
        Self {
            board,
            turn,
            status,
            resigned_by: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The side that resigned, if the game ended by resignation.
    pub fn resigned_by(&self) -> Option<Color> {
        self.resigned_by
    }

    /// The winning side, if the game has a winner.
    ///
    /// After checkmate the side to move has lost; after a resignation the
    /// other side wins. Stalemate and live games have no winner.
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Checkmate => Some(self.turn.opponent()),
            GameStatus::Resigned => self.resigned_by.map(Color::opponent),
            _ => None,
        }
    }

    /// Legal moves of the piece on `from` for the side to move.
    ///
    /// Empty if the game is over or the square holds no piece of the
    /// side to move.
    pub fn legal_moves_from(&self, from: Position) -> HashSet<Move> {
        if self.status.is_terminal() {
            return HashSet::new();
        }
        engine::legal_moves(&self.board, from, self.turn)
    }

    /// Validates and plays `mv` on behalf of `requester`.
    ///
    /// Checks run in order: turn (and liveness), source square, owner,
    /// legality. On success the turn passes to the other side and the
    /// status is recomputed for it.
    pub fn apply_move(&mut self, requester: Color, mv: Move) -> Result<(), RulesError> {
        if requester != self.turn || self.status.is_terminal() {
            return Err(RulesError::NotYourTurn(requester));
        }
        let piece = self
            .board
            .piece_at(mv.from)
            .ok_or(RulesError::NoPieceAtSource(mv.from))?;
        if piece.color != requester {
            return Err(RulesError::WrongOwner(mv.from, requester));
        }
        if !engine::legal_moves(&self.board, mv.from, requester).contains(&mv) {
            tracing::trace!(%mv, color = %requester, "rejected illegal move");
            return Err(RulesError::IllegalMove(mv));
        }

        engine::apply_unchecked(&mut self.board, mv);
        self.turn = requester.opponent();
        let in_check = engine::is_in_check(&self.board, self.turn);
        self.status = engine::status(&self.board, self.turn, in_check);
        Ok(())
    }

    /// Ends the game with `requester` resigning.
    ///
    /// Either side may resign at any point while the game is live,
    /// regardless of whose turn it is.
    pub fn resign(&mut self, requester: Color) -> Result<(), RulesError> {
        if self.status.is_terminal() {
            return Err(RulesError::MatchAlreadyOver);
        }
        self.status = GameStatus::Resigned;
        self.resigned_by = Some(requester);
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
