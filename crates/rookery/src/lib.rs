//! # Rookery
//!
//! Server-authoritative chess backend.
//!
//! Two players and any number of observers attach to a match over a
//! WebSocket. The server validates every move against the full rules
//! (pins, check, checkmate, stalemate, promotion), serializes all
//! changes to a match through a single task, and pushes the resulting
//! state to everyone watching.
//!
//! Accounts and storage stay outside: plug them in through the
//! [`IdentityResolver`](rookery_session::IdentityResolver),
//! [`MatchDirectory`](rookery_session::MatchDirectory) and
//! [`StateSink`](rookery_session::StateSink) traits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rookery::prelude::*;
//!
//! # async fn run() -> Result<(), RookeryError> {
//! rookery::init_tracing();
//!
//! let identities = Arc::new(MemoryIdentities::new());
//! let matches = Arc::new(MemoryMatches::new());
//! let token = identities.issue("alice").await;
//! let game_id = matches.create(Some("alice".into()), None).await;
//! println!("alice can CONNECT to {game_id} with token {token}");
//!
//! let server = RookeryServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(identities, Arc::clone(&matches), matches)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod telemetry;

pub use error::RookeryError;
pub use server::{RookeryServer, RookeryServerBuilder, ServerConfig};
pub use telemetry::init_tracing;

/// Everything needed to run a server and talk to it.
pub mod prelude {
    pub use crate::{init_tracing, RookeryError, RookeryServer, RookeryServerBuilder, ServerConfig};

    pub use rookery_hub::{HubConfig, HubError, SessionHub};
    pub use rookery_protocol::{Codec, Command, GameId, Identity, JsonCodec, ServerMessage};
    pub use rookery_rules::{
        Board, Color, GameState, GameStatus, Move, Piece, PieceType, Position, RulesError,
    };
    pub use rookery_session::{
        IdentityResolver, MatchDirectory, MatchRecord, MemoryIdentities, MemoryMatches, Role,
        SessionError, StateSink,
    };
}
