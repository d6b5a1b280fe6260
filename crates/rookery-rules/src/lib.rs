//! Chess rules for Rookery.
//!
//! This crate is the algorithmic core. It has no I/O and no async: it
//! represents a position and decides what may happen next.
//!
//! - **Types** ([`Position`], [`Piece`], [`Move`], ...): the values
//!   everything else is built from.
//! - **Board** ([`Board`]): the 8×8 grid.
//! - **Move generation** ([`movegen`]): pseudo-legal moves per piece kind.
//! - **Rule engine** ([`engine`]): legality, check, mate, stalemate.
//! - **Game** ([`GameState`]): the turn-by-turn state machine.
//!
//! Castling and en passant are not implemented.
//!
//! ```text
//! GameState::apply_move → engine::legal_moves → movegen::pseudo_legal_moves
//!                                ↓
//!                       scratch Board copies
//! ```

mod board;
pub mod engine;
mod error;
mod game;
pub mod movegen;
mod types;

pub use board::Board;
pub use error::{PositionError, RulesError};
pub use game::{GameState, GameStatus};
pub use movegen::MoveGenerator;
pub use types::{Color, Move, Piece, PieceType, Position};
