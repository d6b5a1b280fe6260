//! Server builder and accept loop.

use std::sync::Arc;
use std::time::Duration;

use rookery_hub::{HubConfig, SessionHub};
use rookery_protocol::{Codec, JsonCodec};
use rookery_session::{IdentityResolver, MatchDirectory, StateSink};
use rookery_transport::{Transport, WebSocketTransport};
use serde::{Deserialize, Serialize};

use crate::handler::handle_connection;
use crate::RookeryError;

/// Network settings for a [`RookeryServer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on. Port `0` picks a free port.
    pub bind_addr: String,
    /// A connection that sends nothing for this long is closed.
    pub idle_timeout: Duration,
    /// A peer that takes longer than this to accept one frame is
    /// dropped, along with whatever is still queued for it.
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            idle_timeout: Duration::from_secs(300),
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// Shared state handed to every connection task.
pub(crate) struct ServerState<I, D, S: StateSink, C> {
    pub(crate) identities: I,
    pub(crate) directory: D,
    pub(crate) hub: SessionHub<S>,
    pub(crate) codec: C,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a Rookery server.
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use rookery::prelude::*;
///
/// # async fn run() -> Result<(), RookeryError> {
/// let identities = MemoryIdentities::new();
/// let matches = Arc::new(MemoryMatches::new());
///
/// let server = RookeryServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(identities, Arc::clone(&matches), matches)
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RookeryServerBuilder {
    config: ServerConfig,
    hub_config: HubConfig,
}

impl RookeryServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listen address (default `127.0.0.1:8080`).
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets how long a silent connection is kept open.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Sets how long a single outbound frame may take to go out.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    pub fn hub_config(mut self, config: HubConfig) -> Self {
        self.hub_config = config;
        self
    }

    /// Binds the listener and wires the collaborators into a server.
    ///
    /// `directory` answers "who plays in this match"; `sink` receives
    /// every new state. One value may serve as both, as
    /// [`MemoryMatches`](rookery_session::MemoryMatches) does.
    pub async fn build<I, D, S>(
        self,
        identities: I,
        directory: D,
        sink: Arc<S>,
    ) -> Result<RookeryServer<I, D, S, JsonCodec>, RookeryError>
    where
        I: IdentityResolver,
        D: MatchDirectory,
        S: StateSink,
    {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            identities,
            directory,
            hub: SessionHub::new(sink, self.hub_config),
            codec: JsonCodec,
            config: self.config,
        });

        Ok(RookeryServer { transport, state })
    }
}

/// A bound Rookery server, ready to [`run`](Self::run).
pub struct RookeryServer<I, D, S: StateSink, C> {
    transport: WebSocketTransport,
    state: Arc<ServerState<I, D, S, C>>,
}

impl<I, D, S, C> RookeryServer<I, D, S, C>
where
    I: IdentityResolver,
    D: MatchDirectory,
    S: StateSink,
    C: Codec,
{
    /// The address the server is listening on.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the server's hub, for queries and for retiring
    /// matches from outside the connection handlers.
    pub fn hub(&self) -> SessionHub<S> {
        self.state.hub.clone()
    }

    /// Accepts connections forever, one task per connection.
    pub async fn run(mut self) -> Result<(), RookeryError> {
        tracing::info!(
            addr = %self.state.config.bind_addr,
            "Rookery server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
        assert_eq!(config.write_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_overrides() {
        let builder = RookeryServerBuilder::new()
            .bind("0.0.0.0:9000")
            .idle_timeout(Duration::from_secs(5))
            .write_timeout(Duration::from_millis(250))
            .hub_config(HubConfig { command_buffer: 4 });

        assert_eq!(builder.config.bind_addr, "0.0.0.0:9000");
        assert_eq!(builder.config.idle_timeout, Duration::from_secs(5));
        assert_eq!(builder.config.write_timeout, Duration::from_millis(250));
        assert_eq!(builder.hub_config.command_buffer, 4);
    }
}
