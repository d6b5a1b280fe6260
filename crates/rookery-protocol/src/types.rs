//! Wire types: what clients send and what the server sends back.
//!
//! Every frame is one JSON object. Client commands carry a
//! `commandType` discriminator, server messages a `serverMessageType`
//! one:
//!
//! ```text
//! → {"commandType":"MAKE_MOVE","gameID":7,"authToken":"…","move":{"from":"e2","to":"e4"}}
//! ← {"serverMessageType":"LOAD_GAME","game":{"board":[…],"turn":"BLACK","status":"IN_PROGRESS"}}
//! ← {"serverMessageType":"NOTIFICATION","message":"alice moved e2e4"}
//! ← {"serverMessageType":"ERROR","errorMessage":"it is not white's turn"}
//! ```

use std::fmt;

use rookery_rules::{GameState, Move};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of one match.
///
/// Serializes as a plain number (`7`, not `{"0":7}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// The identity an auth token resolves to, usually a username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// ---------------------------------------------------------------------------
// Command — client → server
// ---------------------------------------------------------------------------

/// A command sent by a client.
///
/// Every command names the match it targets and repeats the auth token,
/// so the server re-resolves the sender on each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "commandType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Attach this connection to a match as player or observer.
    Connect {
        #[serde(rename = "gameID")]
        game_id: GameId,
        #[serde(rename = "authToken")]
        auth_token: String,
    },

    /// Play a move in the match this connection is attached to.
    MakeMove {
        #[serde(rename = "gameID")]
        game_id: GameId,
        #[serde(rename = "authToken")]
        auth_token: String,
        #[serde(rename = "move")]
        mv: Move,
    },

    /// Detach from the match. The connection stays open.
    Leave {
        #[serde(rename = "gameID")]
        game_id: GameId,
        #[serde(rename = "authToken")]
        auth_token: String,
    },

    /// Resign the match.
    Resign {
        #[serde(rename = "gameID")]
        game_id: GameId,
        #[serde(rename = "authToken")]
        auth_token: String,
    },
}

impl Command {
    /// The match this command targets.
    pub fn game_id(&self) -> GameId {
        match self {
            Self::Connect { game_id, .. }
            | Self::MakeMove { game_id, .. }
            | Self::Leave { game_id, .. }
            | Self::Resign { game_id, .. } => *game_id,
        }
    }

    pub fn auth_token(&self) -> &str {
        match self {
            Self::Connect { auth_token, .. }
            | Self::MakeMove { auth_token, .. }
            | Self::Leave { auth_token, .. }
            | Self::Resign { auth_token, .. } => auth_token,
        }
    }

    /// The wire name of the command, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "CONNECT",
            Self::MakeMove { .. } => "MAKE_MOVE",
            Self::Leave { .. } => "LEAVE",
            Self::Resign { .. } => "RESIGN",
        }
    }

    /// Checks what serde cannot: the token must not be blank.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.auth_token().trim().is_empty() {
            return Err(ProtocolError::InvalidMessage(format!(
                "{} without authToken",
                self.kind()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ServerMessage — server → client
// ---------------------------------------------------------------------------

/// A message delivered to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// The full authoritative state of the match.
    LoadGame { game: GameState },

    /// A human-readable event: join, leave, move, resignation, check.
    Notification { message: String },

    /// A rejected command. Only ever sent to the connection that sent it.
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl ServerMessage {
    pub fn load_game(game: GameState) -> Self {
        Self::LoadGame { game }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// An ERROR carrying the `Display` text of `err`.
    pub fn error(err: impl fmt::Display) -> Self {
        Self::Error {
            error_message: err.to_string(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use rookery_rules::{Color, GameStatus, PieceType, Position};
    use serde_json::json;

    use super::*;

    fn sq(name: &str) -> Position {
        name.parse().unwrap()
    }

    #[test]
    fn test_game_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&GameId(42)).unwrap(), "42");
        assert_eq!(serde_json::from_str::<GameId>("42").unwrap(), GameId(42));
        assert_eq!(GameId(3).to_string(), "G-3");
    }

    #[test]
    fn test_identity_serializes_as_plain_string() {
        let id = Identity::new("alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"alice\"");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn test_command_connect_json_format() {
        let cmd = Command::Connect {
            game_id: GameId(7),
            auth_token: "tok".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();

        assert_eq!(
            json,
            json!({"commandType": "CONNECT", "gameID": 7, "authToken": "tok"})
        );
    }

    #[test]
    fn test_command_make_move_parses_without_promotion() {
        let cmd: Command = serde_json::from_value(json!({
            "commandType": "MAKE_MOVE",
            "gameID": 1,
            "authToken": "tok",
            "move": {"from": "e2", "to": "e4"}
        }))
        .unwrap();

        assert_eq!(
            cmd,
            Command::MakeMove {
                game_id: GameId(1),
                auth_token: "tok".into(),
                mv: Move::new(sq("e2"), sq("e4")),
            }
        );
        assert_eq!(cmd.kind(), "MAKE_MOVE");
    }

    #[test]
    fn test_command_make_move_parses_promotion() {
        let cmd: Command = serde_json::from_value(json!({
            "commandType": "MAKE_MOVE",
            "gameID": 1,
            "authToken": "tok",
            "move": {"from": "e7", "to": "e8", "promotion": "QUEEN"}
        }))
        .unwrap();

        let Command::MakeMove { mv, .. } = cmd else {
            panic!("expected MAKE_MOVE, got {cmd:?}");
        };
        assert_eq!(mv.promotion, Some(PieceType::Queen));
    }

    #[test]
    fn test_command_leave_and_resign_json_format() {
        let leave: Command =
            serde_json::from_str(r#"{"commandType":"LEAVE","gameID":2,"authToken":"t"}"#).unwrap();
        let resign: Command =
            serde_json::from_str(r#"{"commandType":"RESIGN","gameID":2,"authToken":"t"}"#).unwrap();

        assert_eq!(leave.game_id(), GameId(2));
        assert_eq!(leave.kind(), "LEAVE");
        assert_eq!(resign.auth_token(), "t");
        assert_eq!(resign.kind(), "RESIGN");
    }

    #[test]
    fn test_command_unknown_type_rejected() {
        let result =
            serde_json::from_str::<Command>(r#"{"commandType":"CASTLE","gameID":1,"authToken":"t"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_bad_square_rejected() {
        let result = serde_json::from_value::<Command>(json!({
            "commandType": "MAKE_MOVE",
            "gameID": 1,
            "authToken": "tok",
            "move": {"from": "e9", "to": "e4"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_command_validate_blank_token_rejected() {
        let cmd = Command::Leave {
            game_id: GameId(1),
            auth_token: "  ".into(),
        };
        assert!(matches!(
            cmd.validate(),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_server_message_load_game_json_format() {
        let msg = ServerMessage::load_game(GameState::new());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["serverMessageType"], "LOAD_GAME");
        assert_eq!(json["game"]["turn"], "WHITE");
        assert_eq!(json["game"]["status"], "IN_PROGRESS");
        assert_eq!(json["game"]["board"].as_array().unwrap().len(), 8);

        let back: ServerMessage = serde_json::from_value(json).unwrap();
        let ServerMessage::LoadGame { game } = back else {
            panic!("expected LOAD_GAME");
        };
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_server_message_notification_and_error_json_format() {
        assert_eq!(
            serde_json::to_value(ServerMessage::notification("bob joined as observer")).unwrap(),
            json!({"serverMessageType": "NOTIFICATION", "message": "bob joined as observer"})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::error("unknown match G-9")).unwrap(),
            json!({"serverMessageType": "ERROR", "errorMessage": "unknown match G-9"})
        );
    }
}
