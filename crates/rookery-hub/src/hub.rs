//! The session hub: a registry of match actors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rookery_protocol::GameId;
use rookery_rules::{GameState, Move, Position};
use rookery_session::{MatchRecord, StateSink};
use rookery_transport::ConnectionId;
use tokio::sync::RwLock;

use crate::actor::{spawn_match, MatchHandle};
use crate::{Attachment, HubConfig, HubError};

/// Owns the live state of every active match.
///
/// The hub itself only maps game ids to actor handles. The registry lock
/// is held just long enough to look up or insert a handle, never while a
/// command runs, so matches make progress independently.
///
/// Cloning a `SessionHub` is cheap and yields a handle to the same hub.
pub struct SessionHub<S: StateSink> {
    inner: Arc<HubInner<S>>,
}

struct HubInner<S: StateSink> {
    matches: RwLock<HashMap<GameId, MatchHandle>>,
    sink: Arc<S>,
    config: HubConfig,
}

impl<S: StateSink> Clone for SessionHub<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StateSink> SessionHub<S> {
    /// Creates an empty hub that reports state changes to `sink`.
    pub fn new(sink: Arc<S>, config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                matches: RwLock::new(HashMap::new()),
                sink,
                config,
            }),
        }
    }

    async fn handle(&self, game_id: GameId) -> Result<MatchHandle, HubError> {
        self.inner
            .matches
            .read()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(HubError::UnknownMatch(game_id))
    }

    /// Returns the actor for `record`, starting it from the record's
    /// state if the match is not live yet.
    async fn handle_or_spawn(&self, record: &MatchRecord) -> MatchHandle {
        let game_id = record.game_id;
        if let Some(handle) = self.inner.matches.read().await.get(&game_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }

        let mut matches = self.inner.matches.write().await;
        match matches.get(&game_id) {
            Some(handle) if !handle.is_closed() => handle.clone(),
            _ => {
                let handle = spawn_match(
                    record,
                    Arc::clone(&self.inner.sink),
                    self.inner.config.command_buffer,
                );
                matches.insert(game_id, handle.clone());
                tracing::info!(%game_id, live_matches = matches.len(), "match activated");
                handle
            }
        }
    }

    /// Attaches a connection to the match described by `record`.
    ///
    /// The connection receives the current state (LOAD_GAME); everyone
    /// already attached receives a join notification. The first attach
    /// starts the match from `record.state`; later attaches ignore it.
    pub async fn attach(&self, record: &MatchRecord, attachment: Attachment) -> Result<(), HubError> {
        self.handle_or_spawn(record).await.attach(attachment).await
    }

    /// Detaches a connection. Returns `false` if it was not attached,
    /// which makes repeated detaches harmless.
    pub async fn detach(&self, game_id: GameId, connection: ConnectionId) -> bool {
        match self.handle(game_id).await {
            Ok(handle) => handle.detach(connection).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Plays `mv` for the colour `connection` is attached as.
    ///
    /// On success every connection gets the new state; on failure nothing
    /// is broadcast and the error is returned to the caller alone.
    pub async fn submit_move(
        &self,
        game_id: GameId,
        connection: ConnectionId,
        mv: Move,
    ) -> Result<GameState, HubError> {
        self.handle(game_id)
            .await?
            .submit_move(connection, mv)
            .await
    }

    /// Resigns on behalf of the colour `connection` is attached as.
    pub async fn submit_resign(
        &self,
        game_id: GameId,
        connection: ConnectionId,
    ) -> Result<GameState, HubError> {
        self.handle(game_id).await?.submit_resign(connection).await
    }

    /// The current state of a live match.
    pub async fn snapshot(&self, game_id: GameId) -> Result<GameState, HubError> {
        self.handle(game_id).await?.snapshot().await
    }

    /// Legal moves from `from` for the side to move.
    pub async fn legal_moves_from(
        &self,
        game_id: GameId,
        from: Position,
    ) -> Result<HashSet<Move>, HubError> {
        self.handle(game_id).await?.legal_moves_from(from).await
    }

    /// Number of connections attached to a live match.
    pub async fn connection_count(&self, game_id: GameId) -> Result<usize, HubError> {
        self.handle(game_id).await?.connection_count().await
    }

    /// Number of live matches.
    pub async fn match_count(&self) -> usize {
        self.inner.matches.read().await.len()
    }

    /// Stops a match and forgets it. Attached connections get a closing
    /// notification. Returns only after every state the match produced
    /// has been handed to the sink, so a later attach restarts the match
    /// from whatever the match directory then holds.
    ///
    /// Returns `false` if the match was not live.
    pub async fn retire(&self, game_id: GameId) -> bool {
        let handle = self.inner.matches.write().await.remove(&game_id);
        match handle {
            Some(handle) => {
                handle.shutdown().await;
                tracing::info!(%game_id, "match retired");
                true
            }
            None => false,
        }
    }
}
