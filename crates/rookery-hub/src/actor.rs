//! Match actor: a Tokio task that owns one match.
//!
//! Every operation on a match (attach, detach, move, resign, queries)
//! arrives through the actor's bounded mpsc queue and runs to
//! completion before the next one starts. That queue is the match's
//! only serialization point: no lock is ever held around a
//! [`GameState`].
//!
//! ```text
//!  SessionHub ──MatchCommand──▶ MatchActor ──ServerMessage──▶ connection writers
//!                                   │
//!                                   └──GameState──▶ persistence task ──▶ StateSink
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rookery_protocol::{GameId, Identity, ServerMessage};
use rookery_rules::{Color, GameState, GameStatus, Move, Position};
use rookery_session::{MatchRecord, StateSink};
use rookery_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::attachment::Recipient;
use crate::{Attachment, HubError};

/// Commands sent to a match actor.
///
/// The `oneshot::Sender` in each variant is the reply channel.
pub(crate) enum MatchCommand {
    Attach {
        attachment: Attachment,
        reply: oneshot::Sender<()>,
    },
    Detach {
        connection: ConnectionId,
        reply: oneshot::Sender<bool>,
    },
    Move {
        connection: ConnectionId,
        mv: Move,
        reply: oneshot::Sender<Result<GameState, HubError>>,
    },
    Resign {
        connection: ConnectionId,
        reply: oneshot::Sender<Result<GameState, HubError>>,
    },
    Snapshot {
        reply: oneshot::Sender<GameState>,
    },
    LegalMoves {
        from: Position,
        reply: oneshot::Sender<HashSet<Move>>,
    },
    ConnectionCount {
        reply: oneshot::Sender<usize>,
    },
    /// Answered once every state produced so far has reached the sink.
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a running match actor. Cheap to clone.
#[derive(Clone)]
pub(crate) struct MatchHandle {
    game_id: GameId,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> MatchCommand,
    ) -> Result<T, HubError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| HubError::Unavailable(self.game_id))?;
        reply_rx
            .await
            .map_err(|_| HubError::Unavailable(self.game_id))
    }

    pub(crate) async fn attach(&self, attachment: Attachment) -> Result<(), HubError> {
        self.request(|reply| MatchCommand::Attach { attachment, reply })
            .await
    }

    pub(crate) async fn detach(&self, connection: ConnectionId) -> Result<bool, HubError> {
        self.request(|reply| MatchCommand::Detach { connection, reply })
            .await
    }

    pub(crate) async fn submit_move(
        &self,
        connection: ConnectionId,
        mv: Move,
    ) -> Result<GameState, HubError> {
        self.request(|reply| MatchCommand::Move {
            connection,
            mv,
            reply,
        })
        .await?
    }

    pub(crate) async fn submit_resign(
        &self,
        connection: ConnectionId,
    ) -> Result<GameState, HubError> {
        self.request(|reply| MatchCommand::Resign { connection, reply })
            .await?
    }

    pub(crate) async fn snapshot(&self) -> Result<GameState, HubError> {
        self.request(|reply| MatchCommand::Snapshot { reply }).await
    }

    pub(crate) async fn legal_moves_from(&self, from: Position) -> Result<HashSet<Move>, HubError> {
        self.request(|reply| MatchCommand::LegalMoves { from, reply })
            .await
    }

    pub(crate) async fn connection_count(&self) -> Result<usize, HubError> {
        self.request(|reply| MatchCommand::ConnectionCount { reply })
            .await
    }

    /// Stops the actor after the commands already queued and waits for
    /// its pending writes to the sink.
    pub(crate) async fn shutdown(&self) {
        if let Err(err) = self.request(|reply| MatchCommand::Shutdown { reply }).await {
            tracing::debug!(game_id = %self.game_id, %err, "match was already stopped");
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The state owned by one match task.
struct MatchActor {
    game_id: GameId,
    state: GameState,
    white: Option<Identity>,
    black: Option<Identity>,
    attachments: HashMap<ConnectionId, Attachment>,
    /// Connections whose channel turned out to be closed during a send.
    dead: Vec<ConnectionId>,
    receiver: mpsc::Receiver<MatchCommand>,
    persist: mpsc::UnboundedSender<GameState>,
    persist_task: JoinHandle<()>,
}

impl MatchActor {
    async fn run(mut self) {
        tracing::info!(game_id = %self.game_id, "match actor started");

        let mut stopped_by = None;
        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                MatchCommand::Attach { attachment, reply } => {
                    self.handle_attach(attachment);
                    let _ = reply.send(());
                }
                MatchCommand::Detach { connection, reply } => {
                    let removed = self.handle_detach(connection);
                    let _ = reply.send(removed);
                }
                MatchCommand::Move {
                    connection,
                    mv,
                    reply,
                } => {
                    let result = self.handle_move(connection, mv);
                    let _ = reply.send(result);
                }
                MatchCommand::Resign { connection, reply } => {
                    let result = self.handle_resign(connection);
                    let _ = reply.send(result);
                }
                MatchCommand::Snapshot { reply } => {
                    let _ = reply.send(self.state.clone());
                }
                MatchCommand::LegalMoves { from, reply } => {
                    let _ = reply.send(self.state.legal_moves_from(from));
                }
                MatchCommand::ConnectionCount { reply } => {
                    let _ = reply.send(self.attachments.len());
                }
                MatchCommand::Shutdown { reply } => {
                    self.send(
                        Recipient::All,
                        ServerMessage::notification("the match has been closed"),
                    );
                    stopped_by = Some(reply);
                    break;
                }
            }
        }

        let Self {
            game_id,
            persist,
            persist_task,
            ..
        } = self;
        // Closing the queue lets the persistence task finish what it holds.
        drop(persist);
        if let Err(err) = persist_task.await {
            tracing::warn!(%game_id, %err, "persistence task failed");
        }
        tracing::info!(%game_id, "match actor stopped");
        if let Some(reply) = stopped_by {
            let _ = reply.send(());
        }
    }

    fn handle_attach(&mut self, attachment: Attachment) {
        let connection = attachment.connection;
        let identity = attachment.identity.clone();
        let role = attachment.role;
        let rejoined = self
            .attachments
            .insert(connection, attachment)
            .is_some();

        tracing::info!(
            game_id = %self.game_id,
            %connection,
            %identity,
            %role,
            connections = self.attachments.len(),
            "connection attached"
        );

        self.send(
            Recipient::Only(connection),
            ServerMessage::load_game(self.state.clone()),
        );
        if !rejoined {
            self.send(
                Recipient::AllExcept(connection),
                ServerMessage::notification(format!(
                    "{identity} connected to the game as {role}"
                )),
            );
        }
    }

    fn handle_detach(&mut self, connection: ConnectionId) -> bool {
        let Some(attachment) = self.attachments.remove(&connection) else {
            return false;
        };
        tracing::info!(
            game_id = %self.game_id,
            %connection,
            identity = %attachment.identity,
            connections = self.attachments.len(),
            "connection detached"
        );
        self.send(
            Recipient::All,
            ServerMessage::notification(format!("{} has left the game", attachment.identity)),
        );
        true
    }

    fn handle_move(&mut self, connection: ConnectionId, mv: Move) -> Result<GameState, HubError> {
        let (color, identity) = self.player(connection)?;
        let game_id = self.game_id;
        self.state.apply_move(color, mv).inspect_err(|err| {
            tracing::debug!(%game_id, %connection, %mv, %err, "move rejected");
        })?;

        tracing::info!(
            %game_id,
            %identity,
            %mv,
            status = ?self.state.status(),
            "move applied"
        );

        self.persist();
        self.send(Recipient::All, ServerMessage::load_game(self.state.clone()));
        self.send(
            Recipient::AllExcept(connection),
            ServerMessage::notification(format!("{identity} moved {mv}")),
        );
        if let Some(message) = self.status_message() {
            self.send(Recipient::All, ServerMessage::notification(message));
        }
        Ok(self.state.clone())
    }

    fn handle_resign(&mut self, connection: ConnectionId) -> Result<GameState, HubError> {
        let (color, identity) = self.player(connection)?;
        let game_id = self.game_id;
        self.state.resign(color).inspect_err(|err| {
            tracing::debug!(%game_id, %connection, %err, "resignation rejected");
        })?;

        tracing::info!(%game_id, %identity, %color, "player resigned");

        self.persist();
        self.send(Recipient::All, ServerMessage::load_game(self.state.clone()));
        self.send(
            Recipient::All,
            ServerMessage::notification(format!(
                "{identity} has resigned from the game, {} wins",
                self.label(color.opponent())
            )),
        );
        Ok(self.state.clone())
    }

    /// The colour `connection` plays, and who is playing it.
    fn player(&self, connection: ConnectionId) -> Result<(Color, Identity), HubError> {
        let attachment = self
            .attachments
            .get(&connection)
            .ok_or(HubError::NotAParticipant(self.game_id))?;
        let color = attachment
            .role
            .color()
            .ok_or(HubError::NotAParticipant(self.game_id))?;
        Ok((color, attachment.identity.clone()))
    }

    /// "alice (white)" when the seat is known, "white" otherwise.
    fn label(&self, color: Color) -> String {
        let seat = match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        };
        match seat {
            Some(name) => format!("{name} ({color})"),
            None => color.to_string(),
        }
    }

    fn status_message(&self) -> Option<String> {
        let turn = self.state.turn();
        match self.state.status() {
            GameStatus::Check => Some(format!("{} is in check", self.label(turn))),
            GameStatus::Checkmate => Some(format!(
                "{} is checkmated, {} wins",
                self.label(turn),
                self.label(turn.opponent())
            )),
            GameStatus::Stalemate => Some("stalemate, the game is drawn".to_owned()),
            GameStatus::InProgress | GameStatus::Resigned => None,
        }
    }

    fn persist(&self) {
        if self.persist.send(self.state.clone()).is_err() {
            tracing::warn!(game_id = %self.game_id, "persistence task has stopped");
        }
    }

    /// Delivers `msg` and then detaches every connection that could not
    /// take it.
    fn send(&mut self, recipient: Recipient, msg: ServerMessage) {
        self.deliver(recipient, msg);
        self.reap();
    }

    /// Queues `msg` on each recipient's channel. Never blocks.
    fn deliver(&mut self, recipient: Recipient, msg: ServerMessage) {
        for (connection, attachment) in &self.attachments {
            if recipient.includes(*connection) && attachment.sender.send(msg.clone()).is_err() {
                self.dead.push(*connection);
            }
        }
    }

    /// A failed send counts as a detach. The leave notification can in
    /// turn find more closed channels, so this loops until none are left.
    fn reap(&mut self) {
        while let Some(connection) = self.dead.pop() {
            if let Some(attachment) = self.attachments.remove(&connection) {
                tracing::debug!(
                    game_id = %self.game_id,
                    %connection,
                    "outbound channel closed, detaching"
                );
                self.deliver(
                    Recipient::All,
                    ServerMessage::notification(format!(
                        "{} has left the game",
                        attachment.identity
                    )),
                );
            }
        }
    }
}

/// Writes states to the sink one at a time, in the order the actor
/// produced them.
async fn persist_states<S: StateSink>(
    game_id: GameId,
    sink: Arc<S>,
    mut states: mpsc::UnboundedReceiver<GameState>,
) {
    while let Some(state) = states.recv().await {
        if let Err(err) = sink.on_state_changed(game_id, &state).await {
            tracing::warn!(%game_id, %err, "failed to persist match state");
        }
    }
}

/// Spawns the actor and persistence tasks for `record` and returns a
/// handle to the actor.
pub(crate) fn spawn_match<S: StateSink>(
    record: &MatchRecord,
    sink: Arc<S>,
    command_buffer: usize,
) -> MatchHandle {
    let game_id = record.game_id;
    let (tx, rx) = mpsc::channel(command_buffer.max(1));
    let (persist_tx, persist_rx) = mpsc::unbounded_channel();

    let persist_task = tokio::spawn(persist_states(game_id, sink, persist_rx));

    let actor = MatchActor {
        game_id,
        state: record.state.clone(),
        white: record.white.clone(),
        black: record.black.clone(),
        attachments: HashMap::new(),
        dead: Vec::new(),
        receiver: rx,
        persist: persist_tx,
        persist_task,
    };
    tokio::spawn(actor.run());

    MatchHandle {
        game_id,
        sender: tx,
    }
}
