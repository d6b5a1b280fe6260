//! Error types for the hub.

use rookery_protocol::GameId;
use rookery_rules::RulesError;

/// Errors returned by [`SessionHub`](crate::SessionHub) operations.
///
/// All of them go back to the one connection that asked; none affects
/// the match or anyone else attached to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    /// No live match with this id.
    #[error("unknown match {0}")]
    UnknownMatch(GameId),

    /// The connection is not attached to the match, or is attached as an
    /// observer and tried to play.
    #[error("not a participant in match {0}")]
    NotAParticipant(GameId),

    /// The move or resignation broke the rules. State is unchanged.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The match actor has stopped (retired while the command was in
    /// flight).
    #[error("match {0} is unavailable")]
    Unavailable(GameId),
}
