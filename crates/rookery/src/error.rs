//! Unified error type for Rookery.

use rookery_hub::HubError;
use rookery_protocol::ProtocolError;
use rookery_session::SessionError;
use rookery_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// The `Display` text of a client-caused error is exactly what the client
/// receives in an ERROR message, so every variant is transparent.
#[derive(Debug, thiserror::Error)]
pub enum RookeryError {
    /// Binding, accepting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be decoded or a message encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Unknown token or match, or a storage failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Rejected by the hub: rules, participation, unknown match.
    #[error(transparent)]
    Hub(#[from] HubError),
}

#[cfg(test)]
mod tests {
    use rookery_protocol::GameId;
    use rookery_rules::{Color, RulesError};

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: RookeryError = TransportError::ConnectionClosed("gone".into()).into();
        assert!(matches!(err, RookeryError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: RookeryError = ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, RookeryError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error_keeps_message() {
        let err: RookeryError = SessionError::UnknownToken.into();
        assert!(matches!(err, RookeryError::Session(_)));
        assert_eq!(err.to_string(), "unauthorized: unknown auth token");
    }

    #[test]
    fn test_from_hub_error_keeps_rules_message() {
        let err: RookeryError = HubError::Rules(RulesError::NotYourTurn(Color::Black)).into();
        assert!(matches!(err, RookeryError::Hub(_)));
        assert_eq!(err.to_string(), "it is not black's turn");

        let err: RookeryError = HubError::UnknownMatch(GameId(4)).into();
        assert_eq!(err.to_string(), "unknown match G-4");
    }
}
