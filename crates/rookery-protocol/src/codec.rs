//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust values and frame bytes. The server
//! holds one behind a generic parameter, so the wire format can change
//! without touching the handler.

use serde::{de::DeserializeOwned, Serialize};

use crate::{Command, ProtocolError};

/// Encodes values to frames and decodes frames back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes a client frame and validates the resulting [`Command`].
    fn decode_command(&self, data: &[u8]) -> Result<Command, ProtocolError> {
        let command: Command = self.decode(data)?;
        command.validate()?;
        Ok(command)
    }
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use rookery_protocol::{Codec, Command, GameId, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame = br#"{"commandType":"CONNECT","gameID":1,"authToken":"abc"}"#;
///
/// let command = codec.decode_command(frame).unwrap();
/// assert_eq!(command.game_id(), GameId(1));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
