use rookery_protocol::GameId;

/// Errors reported by the session collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The auth token does not resolve to an identity.
    #[error("unauthorized: unknown auth token")]
    UnknownToken,

    /// No match with this id exists.
    #[error("unknown match {0}")]
    UnknownMatch(GameId),

    /// The storage collaborator failed. Only ever logged by the hub.
    #[error("storage failure: {0}")]
    Storage(String),
}
