//! JSON codec backed by serde_json
//!
//! Non-finite floats are written as `null` by serde_json rather than
//! rejected, so they surface later as a decode failure when read back
//! into a float field.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{CodecError, CodecResult, Position};
use super::Codec;

/// JSON codec, pretty-printed by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Pretty-printed JSON
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Compact single-line JSON
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Whether output is pretty-printed
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::pretty()
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };

        result.map_err(|e| CodecError::Encode {
            type_name: type_name::<T>(),
            source: Box::new(e),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            type_name: type_name::<T>(),
            position: position_of(bytes, e.line(), e.column()),
            source: Box::new(e),
        })
    }
}

/// Converts serde_json's line/column into a byte offset.
///
/// serde_json reports line 0 when the failure has no position.
fn position_of(bytes: &[u8], line: usize, column: usize) -> Option<Position> {
    if line == 0 {
        return None;
    }

    let line_start = if line == 1 {
        0
    } else {
        bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)?
    };

    let byte_offset = (line_start + column.saturating_sub(1)).min(bytes.len());

    Some(Position {
        line,
        column,
        byte_offset,
    })
}
