//! Codec subsystem
//!
//! Converts typed values to bytes and back. The store is generic over
//! [`Codec`]; [`JsonCodec`] is the shipped implementation and produces
//! human-inspectable UTF-8 JSON.
//!
//! Collections are plain `Vec<T>` / `[T]` values, so element order is
//! whatever the format preserves for sequences (JSON arrays keep it). The
//! empty collection encodes to a well-formed artifact (`[]`).

mod errors;
mod json;

pub use errors::{CodecError, CodecResult, Position};
pub use json::JsonCodec;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize/deserialize contract used by the file store
pub trait Codec: Send + Sync + fmt::Debug {
    /// Encode a single value
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Decode a single value
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T>;

    /// Encode an ordered sequence of values
    fn encode_collection<T: Serialize>(&self, items: &[T]) -> CodecResult<Vec<u8>> {
        self.encode(items)
    }

    /// Decode an ordered sequence of values
    fn decode_collection<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        self.decode(bytes)
    }
}
