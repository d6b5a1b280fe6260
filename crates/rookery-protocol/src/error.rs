//! Error types for the protocol layer.

/// Errors that can occur while turning frames into commands and
/// messages into frames.
///
/// Every variant is recoverable: the server answers a bad frame with an
/// ERROR message and keeps the connection open.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not valid JSON, or does not match any command:
    /// missing fields, an unknown `commandType`, a square like `"z9"`.
    #[cfg(feature = "json")]
    #[error("malformed command: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but is not an acceptable command.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
