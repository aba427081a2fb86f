//! Wire codecs for the request boundary.
//!
//! JSON is what a browser-side client speaks; `MessagePack` is the compact
//! binary alternative for native transports.

use causeway_foundation::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A payload encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Codec {
    /// UTF-8 JSON.
    #[default]
    Json,
    /// `MessagePack` with named struct fields.
    MessagePack,
}

impl Codec {
    /// Encodes a value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>> {
        match self {
            Self::Json => serde_json::to_vec(value).map_err(|e| Error::codec(e.to_string())),
            Self::MessagePack => {
                rmp_serde::to_vec_named(value).map_err(|e| Error::codec(e.to_string()))
            }
        }
    }

    /// Decodes a value.
    ///
    /// # Errors
    ///
    /// Returns a malformed-request error if the bytes are not a valid
    /// encoding of `T`.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T> {
        let decoded = match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::MessagePack => rmp_serde::from_slice(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(Error::malformed_request)
    }
}
