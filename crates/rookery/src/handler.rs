//! Per-connection handler.
//!
//! Each accepted connection runs [`handle_connection`] in its own task:
//!
//! 1. A writer task drains the connection's outbound channel into the
//!    socket. The hub and this handler both send through that channel,
//!    so broadcasts never wait on the reader.
//! 2. The read loop decodes one [`Command`] per frame, resolves the auth
//!    token, and forwards the command to the [`SessionHub`].
//! 3. Any error goes back to this connection alone as an ERROR message;
//!    the connection stays open.
//!
//! When the loop ends (close, error, idle timeout, or a peer that stopped
//! reading) the [`AttachmentGuard`] detaches the connection from its
//! match. Flushing and closing are bounded by
//! [`ServerConfig::write_timeout`](crate::ServerConfig::write_timeout).

use std::sync::Arc;

use rookery_hub::{Attachment, ConnectionSender, HubError, SessionHub};
use rookery_protocol::{Codec, Command, GameId, Identity, ServerMessage};
use rookery_session::{IdentityResolver, MatchDirectory, SessionError, StateSink};
use rookery_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::RookeryError;

/// Remembers which match a connection is attached to and detaches it
/// when dropped, however the handler exits.
struct AttachmentGuard<S: StateSink> {
    hub: SessionHub<S>,
    connection: ConnectionId,
    attached: Option<(GameId, Identity)>,
}

impl<S: StateSink> AttachmentGuard<S> {
    /// Checks that a command for `game_id` from `identity` matches the
    /// attachment made by CONNECT.
    fn require(&self, game_id: GameId, identity: &Identity) -> Result<(), HubError> {
        match &self.attached {
            Some((attached, owner)) if *attached == game_id && owner == identity => Ok(()),
            _ => Err(HubError::NotAParticipant(game_id)),
        }
    }
}

impl<S: StateSink> Drop for AttachmentGuard<S> {
    fn drop(&mut self) {
        if let Some((game_id, _)) = self.attached.take() {
            let hub = self.hub.clone();
            let connection = self.connection;
            tokio::spawn(async move {
                hub.detach(game_id, connection).await;
            });
        }
    }
}

/// Runs one connection until it closes.
pub(crate) async fn handle_connection<I, D, S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<I, D, S, C>>,
) -> Result<(), RookeryError>
where
    I: IdentityResolver,
    D: MatchDirectory,
    S: StateSink,
    C: Codec,
{
    let conn = Arc::new(conn);
    let connection = conn.id();
    tracing::debug!(%connection, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    let mut writer = tokio::spawn(write_outbound(
        Arc::clone(&conn),
        Arc::clone(&state),
        rx,
    ));

    let mut guard = AttachmentGuard {
        hub: state.hub.clone(),
        connection,
        attached: None,
    };

    let result = loop {
        let read = tokio::select! {
            read = tokio::time::timeout(state.config.idle_timeout, conn.recv()) => read,
            // The writer only finishes early when the peer cannot be written to.
            _ = &mut writer => {
                tracing::info!(%connection, "peer stopped accepting messages");
                break Ok(());
            }
        };
        let frame = match read {
            Ok(Ok(Some(frame))) => frame,
            Ok(Ok(None)) => {
                tracing::info!(%connection, "connection closed cleanly");
                break Ok(());
            }
            Ok(Err(e)) => break Err(RookeryError::Transport(e)),
            Err(_) => {
                tracing::info!(%connection, "connection timed out");
                break Ok(());
            }
        };

        let command = match state.codec.decode_command(&frame) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(%connection, error = %e, "failed to decode command");
                let _ = tx.send(ServerMessage::error(&e));
                continue;
            }
        };

        let kind = command.kind();
        if let Err(e) = handle_command(&state, &mut guard, &tx, command).await {
            tracing::debug!(%connection, command = kind, error = %e, "command rejected");
            let _ = tx.send(ServerMessage::error(&e));
        }
    };

    drop(guard);
    drop(tx);
    // The writer stops once the hub has dropped its copy of the sender.
    let write_timeout = state.config.write_timeout;
    if !writer.is_finished() && tokio::time::timeout(write_timeout, &mut writer).await.is_err() {
        tracing::debug!(%connection, "outbound queue not flushed in time, dropping it");
        writer.abort();
    }
    if tokio::time::timeout(write_timeout, conn.close()).await.is_err() {
        tracing::debug!(%connection, "close handshake timed out");
    }
    result
}

/// Executes one decoded command on behalf of `guard.connection`.
async fn handle_command<I, D, S, C>(
    state: &ServerState<I, D, S, C>,
    guard: &mut AttachmentGuard<S>,
    tx: &ConnectionSender,
    command: Command,
) -> Result<(), RookeryError>
where
    I: IdentityResolver,
    D: MatchDirectory,
    S: StateSink,
    C: Codec,
{
    let connection = guard.connection;
    let game_id = command.game_id();
    let identity = state
        .identities
        .resolve_identity(command.auth_token())
        .await?;

    match command {
        Command::Connect { .. } => {
            let record = state.directory.get_match(game_id).await?;
            let role = record.role_of(&identity);

            if let Some((previous, _)) = guard.attached.take() {
                if previous != game_id {
                    state.hub.detach(previous, connection).await;
                }
            }

            let attachment = Attachment::new(connection, identity.clone(), role, tx.clone());
            state.hub.attach(&record, attachment).await?;
            tracing::info!(%connection, %game_id, %identity, %role, "joined match");
            guard.attached = Some((game_id, identity));
        }
        Command::MakeMove { mv, .. } => {
            require_attached(state, guard, game_id, &identity).await?;
            state.hub.submit_move(game_id, connection, mv).await?;
        }
        Command::Resign { .. } => {
            require_attached(state, guard, game_id, &identity).await?;
            state.hub.submit_resign(game_id, connection).await?;
        }
        Command::Leave { .. } => {
            require_attached(state, guard, game_id, &identity).await?;
            guard.attached = None;
            state.hub.detach(game_id, connection).await;
            tracing::info!(%connection, %game_id, %identity, "left match");
        }
    }
    Ok(())
}

/// Like [`AttachmentGuard::require`], but a match the directory has never
/// heard of is reported as unknown rather than as one the sender is not
/// part of.
async fn require_attached<I, D, S, C>(
    state: &ServerState<I, D, S, C>,
    guard: &AttachmentGuard<S>,
    game_id: GameId,
    identity: &Identity,
) -> Result<(), RookeryError>
where
    D: MatchDirectory,
    S: StateSink,
{
    let Err(not_attached) = guard.require(game_id, identity) else {
        return Ok(());
    };
    match state.directory.get_match(game_id).await {
        Err(err @ SessionError::UnknownMatch(_)) => Err(err.into()),
        _ => Err(not_attached.into()),
    }
}

/// Encodes queued messages and writes them to the socket, in order.
async fn write_outbound<I, D, S, C>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<I, D, S, C>>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) where
    I: IdentityResolver,
    D: MatchDirectory,
    S: StateSink,
    C: Codec,
{
    let connection = conn.id();
    while let Some(msg) = rx.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%connection, error = %e, "failed to encode message");
                continue;
            }
        };
        // Returning drops `rx`, so the hub's next send fails and detaches
        // this connection. It also ends the read loop.
        match tokio::time::timeout(state.config.write_timeout, conn.send(&bytes)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(%connection, error = %e, "send failed");
                break;
            }
            Err(_) => {
                tracing::info!(%connection, "send timed out, dropping outbound queue");
                break;
            }
        }
    }
}
