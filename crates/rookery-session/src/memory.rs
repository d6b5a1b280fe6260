//! In-memory collaborators for development and tests.
//!
//! Nothing here survives a restart. Production deployments plug in their
//! own [`IdentityResolver`], [`MatchDirectory`] and [`StateSink`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;
use rookery_protocol::{GameId, Identity};
use rookery_rules::GameState;
use tokio::sync::RwLock;

use crate::{IdentityResolver, MatchDirectory, MatchRecord, SessionError, StateSink};

/// Token → identity table.
#[derive(Debug, Default)]
pub struct MemoryIdentities {
    tokens: RwLock<HashMap<String, Identity>>,
}

impl MemoryIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh token for `identity` and returns it.
    ///
    /// An identity may hold several tokens at once (one per device).
    pub async fn issue(&self, identity: impl Into<Identity>) -> String {
        let identity = identity.into();
        let token = generate_token();
        tracing::debug!(%identity, "issued auth token");
        self.tokens.write().await.insert(token.clone(), identity);
        token
    }

    /// Forgets `token`. Returns `true` if it was known.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

impl IdentityResolver for MemoryIdentities {
    async fn resolve_identity(&self, token: &str) -> Result<Identity, SessionError> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionError::UnknownToken)
    }
}

/// Match table that also records every state it is handed.
#[derive(Debug)]
pub struct MemoryMatches {
    matches: RwLock<HashMap<GameId, MatchRecord>>,
    next_id: AtomicU32,
}

impl Default for MemoryMatches {
    fn default() -> Self {
        Self {
            matches: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
        }
    }
}

impl MemoryMatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a match at the starting position and returns its id.
    pub async fn create(&self, white: Option<Identity>, black: Option<Identity>) -> GameId {
        let game_id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.insert(MatchRecord::new(game_id, white, black)).await;
        game_id
    }

    /// Stores `record` under its id, replacing any previous record.
    pub async fn insert(&self, record: MatchRecord) {
        tracing::debug!(game_id = %record.game_id, "match recorded");
        self.matches.write().await.insert(record.game_id, record);
    }

    /// Takes the free seat of `game_id` for `identity`, white first.
    ///
    /// Returns `false` if the match is full or unknown.
    pub async fn seat(&self, game_id: GameId, identity: Identity) -> bool {
        let mut matches = self.matches.write().await;
        let Some(record) = matches.get_mut(&game_id) else {
            return false;
        };
        if record.white.is_none() {
            record.white = Some(identity);
        } else if record.black.is_none() {
            record.black = Some(identity);
        } else {
            return false;
        }
        true
    }

    /// The last state recorded for `game_id`.
    pub async fn state(&self, game_id: GameId) -> Option<GameState> {
        self.matches
            .read()
            .await
            .get(&game_id)
            .map(|record| record.state.clone())
    }
}

impl MatchDirectory for MemoryMatches {
    async fn get_match(&self, game_id: GameId) -> Result<MatchRecord, SessionError> {
        self.matches
            .read()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(SessionError::UnknownMatch(game_id))
    }
}

impl StateSink for MemoryMatches {
    async fn on_state_changed(
        &self,
        game_id: GameId,
        state: &GameState,
    ) -> Result<(), SessionError> {
        let mut matches = self.matches.write().await;
        let record = matches
            .get_mut(&game_id)
            .ok_or(SessionError::UnknownMatch(game_id))?;
        record.state = state.clone();
        Ok(())
    }
}

/// 128 random bits as 32 lowercase hex characters.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use rookery_rules::{Color, Move};

    use super::*;

    #[test]
    fn test_generate_token_is_32_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn test_issue_then_resolve_returns_identity() {
        let ids = MemoryIdentities::new();
        let token = ids.issue("alice").await;

        assert_eq!(
            ids.resolve_identity(&token).await,
            Ok(Identity::new("alice"))
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_token_fails() {
        let ids = MemoryIdentities::new();
        assert_eq!(
            ids.resolve_identity("nope").await,
            Err(SessionError::UnknownToken)
        );
    }

    #[tokio::test]
    async fn test_revoke_forgets_token() {
        let ids = MemoryIdentities::new();
        let token = ids.issue("alice").await;

        assert!(ids.revoke(&token).await);
        assert!(!ids.revoke(&token).await);
        assert!(ids.resolve_identity(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let matches = MemoryMatches::new();
        let a = matches.create(Some("alice".into()), None).await;
        let b = matches.create(None, None).await;

        assert_eq!(a, GameId(1));
        assert_eq!(b, GameId(2));
        let record = matches.get_match(a).await.unwrap();
        assert_eq!(record.white, Some(Identity::new("alice")));
        assert_eq!(record.state, GameState::new());
    }

    #[tokio::test]
    async fn test_get_match_unknown_fails() {
        let matches = MemoryMatches::new();
        assert_eq!(
            matches.get_match(GameId(9)).await,
            Err(SessionError::UnknownMatch(GameId(9)))
        );
    }

    #[tokio::test]
    async fn test_seat_fills_white_then_black_then_refuses() {
        let matches = MemoryMatches::new();
        let id = matches.create(None, None).await;

        assert!(matches.seat(id, "alice".into()).await);
        assert!(matches.seat(id, "bob".into()).await);
        assert!(!matches.seat(id, "carol".into()).await);

        let record = matches.get_match(id).await.unwrap();
        assert_eq!(record.player(Color::White), Some(&Identity::new("alice")));
        assert_eq!(record.player(Color::Black), Some(&Identity::new("bob")));
    }

    #[tokio::test]
    async fn test_on_state_changed_records_state() {
        let matches = MemoryMatches::new();
        let id = matches.create(None, None).await;
        let mut state = GameState::new();
        state
            .apply_move(Color::White, "e2e4".parse::<Move>().unwrap())
            .unwrap();

        matches.on_state_changed(id, &state).await.unwrap();

        assert_eq!(matches.state(id).await, Some(state));
    }

    #[tokio::test]
    async fn test_on_state_changed_unknown_match_fails() {
        let matches = MemoryMatches::new();
        let result = matches.on_state_changed(GameId(4), &GameState::new()).await;
        assert_eq!(result, Err(SessionError::UnknownMatch(GameId(4))));
    }
}
