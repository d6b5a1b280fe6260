//! Wire protocol for Rookery.
//!
//! - **Types** ([`Command`], [`ServerMessage`], [`GameId`], [`Identity`]):
//!   the JSON objects exchanged with clients.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): frames ⇄ values.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer knows nothing about connections or matches; it only
//! knows the shape of the messages.
//!
//! ```text
//! Transport (frames) → Protocol (Command) → Hub (match actor)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Command, GameId, Identity, ServerMessage};
