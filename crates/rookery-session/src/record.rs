//! Match records and participant roles.

use std::fmt;

use rookery_protocol::{GameId, Identity};
use rookery_rules::{Color, GameState};

/// What a connection may do in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    White,
    Black,
    Observer,
}

impl Role {
    /// The colour this role plays, or `None` for observers.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::White => Some(Color::White),
            Self::Black => Some(Color::Black),
            Self::Observer => None,
        }
    }
}

impl From<Color> for Role {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Black => f.write_str("black"),
            Self::Observer => f.write_str("observer"),
        }
    }
}

/// One match as the storage collaborator knows it.
///
/// Either seat may still be empty while the lobby waits for a second
/// player. Observers are not recorded: everyone who is not seated
/// watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub game_id: GameId,
    pub white: Option<Identity>,
    pub black: Option<Identity>,
    pub state: GameState,
}

impl MatchRecord {
    /// A fresh match at the starting position.
    pub fn new(game_id: GameId, white: Option<Identity>, black: Option<Identity>) -> Self {
        Self {
            game_id,
            white,
            black,
            state: GameState::new(),
        }
    }

    /// The role `identity` has in this match.
    ///
    /// Someone seated on both sides plays white.
    pub fn role_of(&self, identity: &Identity) -> Role {
        if self.white.as_ref() == Some(identity) {
            Role::White
        } else if self.black.as_ref() == Some(identity) {
            Role::Black
        } else {
            Role::Observer
        }
    }

    /// The identity seated on `color`, if any.
    pub fn player(&self, color: Color) -> Option<&Identity> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }
}
