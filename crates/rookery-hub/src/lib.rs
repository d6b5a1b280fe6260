//! Session hub for Rookery.
//!
//! The hub owns the authoritative [`GameState`](rookery_rules::GameState)
//! of every active match and the set of connections watching it.
//!
//! - **Hub** ([`SessionHub`]): registry of live matches, entry point for
//!   every operation.
//! - **Actor**: one Tokio task per match; commands for a match run one at
//!   a time, in arrival order, and different matches run in parallel.
//! - **Attachments** ([`Attachment`], [`ConnectionSender`]): a connection's
//!   identity, role and outbound channel.
//! - **Config** ([`HubConfig`]) and **errors** ([`HubError`]).
//!
//! Persistence is handed to a [`StateSink`](rookery_session::StateSink)
//! on a separate task per match, so a slow store never holds up play.

mod actor;
mod attachment;
mod config;
mod error;
mod hub;

pub use attachment::{Attachment, ConnectionSender};
pub use config::HubConfig;
pub use error::HubError;
pub use hub::SessionHub;
