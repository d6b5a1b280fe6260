//! Connections as the hub sees them.

use rookery_protocol::{Identity, ServerMessage};
use rookery_session::Role;
use rookery_transport::ConnectionId;
use tokio::sync::mpsc;

/// Channel for delivering messages to one connection's writer task.
///
/// Unbounded so that a match actor never waits on a slow socket. A send
/// fails only once the receiving side is gone.
pub type ConnectionSender = mpsc::UnboundedSender<ServerMessage>;

/// A connection attached to a match.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub connection: ConnectionId,
    pub identity: Identity,
    pub role: Role,
    pub sender: ConnectionSender,
}

impl Attachment {
    pub fn new(
        connection: ConnectionId,
        identity: Identity,
        role: Role,
        sender: ConnectionSender,
    ) -> Self {
        Self {
            connection,
            identity,
            role,
            sender,
        }
    }
}

/// Who should receive a message from the match actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recipient {
    /// Every attached connection.
    All,
    /// One specific connection.
    Only(ConnectionId),
    /// Everyone except the specified connection.
    AllExcept(ConnectionId),
}

impl Recipient {
    pub(crate) fn includes(self, connection: ConnectionId) -> bool {
        match self {
            Self::All => true,
            Self::Only(target) => target == connection,
            Self::AllExcept(excluded) => excluded != connection,
        }
    }
}
