//! Hooks into the systems Rookery does not own.
//!
//! Rookery never checks passwords, issues tokens or writes to a
//! database. It asks three narrow questions of whoever does:
//!
//! - [`IdentityResolver`]: who does this auth token belong to?
//! - [`MatchDirectory`]: who plays white and black in this match, and
//!   where does the game stand?
//! - [`StateSink`]: here is the new state of a match, record it.
//!
//! All three are async and may do I/O. The server calls the first two
//! before a command reaches the hub; the hub calls the third from a
//! separate task so that a slow store never holds up a match.

use std::future::Future;
use std::sync::Arc;

use rookery_protocol::{GameId, Identity};
use rookery_rules::GameState;

use crate::{MatchRecord, SessionError};

/// Resolves an auth token to the identity it was issued to.
///
/// # Example
///
/// ```rust
/// use rookery_protocol::Identity;
/// use rookery_session::{IdentityResolver, SessionError};
///
/// /// Treats the token itself as the username. Development only.
/// struct TrustingResolver;
///
/// impl IdentityResolver for TrustingResolver {
///     async fn resolve_identity(&self, token: &str) -> Result<Identity, SessionError> {
///         if token.is_empty() {
///             return Err(SessionError::UnknownToken);
///         }
///         Ok(Identity::new(token))
///     }
/// }
/// ```
pub trait IdentityResolver: Send + Sync + 'static {
    /// Returns the identity for `token`, or
    /// [`SessionError::UnknownToken`].
    fn resolve_identity(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Identity, SessionError>> + Send;
}

/// Looks up match participants and the last recorded state.
pub trait MatchDirectory: Send + Sync + 'static {
    /// Returns the record for `game_id`, or
    /// [`SessionError::UnknownMatch`].
    ///
    /// The state in the record seeds the hub the first time anyone
    /// attaches to the match; after that the hub's copy is
    /// authoritative.
    fn get_match(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<MatchRecord, SessionError>> + Send;
}

/// Receives every state a match passes through.
///
/// Called once after each successful move or resignation, in order.
/// An error is logged and otherwise ignored: the in-memory state is
/// never rolled back.
pub trait StateSink: Send + Sync + 'static {
    fn on_state_changed(
        &self,
        game_id: GameId,
        state: &GameState,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}

// Shared collaborators: a server and the code that seeds it often hold
// the same store.

impl<T: IdentityResolver> IdentityResolver for Arc<T> {
    fn resolve_identity(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Identity, SessionError>> + Send {
        (**self).resolve_identity(token)
    }
}

impl<T: MatchDirectory> MatchDirectory for Arc<T> {
    fn get_match(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<MatchRecord, SessionError>> + Send {
        (**self).get_match(game_id)
    }
}
