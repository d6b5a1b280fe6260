//! Identity, match records and persistence hooks for Rookery.
//!
//! Rookery does not own accounts or storage. This crate defines the
//! narrow interfaces it needs from whoever does:
//!
//! 1. **Identity**: [`IdentityResolver`] turns an auth token into an
//!    [`Identity`](rookery_protocol::Identity).
//! 2. **Matches**: [`MatchDirectory`] says who sits where
//!    ([`MatchRecord`], [`Role`]).
//! 3. **Persistence**: [`StateSink`] is told about every new state.
//!
//! [`MemoryIdentities`] and [`MemoryMatches`] implement all three in
//! memory for tests and the development server.
//!
//! ```text
//! Server (above)  ← resolves tokens and roles before touching the hub
//!     ↕
//! Session (this crate)
//!     ↕
//! Protocol / Rules (below)  ← GameId, Identity, GameState
//! ```

#![allow(async_fn_in_trait)]

mod collaborators;
mod error;
mod memory;
mod record;

pub use collaborators::{IdentityResolver, MatchDirectory, StateSink};
pub use error::SessionError;
pub use memory::{MemoryIdentities, MemoryMatches};
pub use record::{MatchRecord, Role};
