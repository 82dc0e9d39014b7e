//! Codec error types

use thiserror::Error;

use crate::errors::BoxedSource;

/// Location of a decode failure inside the input bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// 0-based byte offset from the start of the input
    pub byte_offset: usize,
}

/// Serialization and deserialization failures
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode {type_name}: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: BoxedSource,
    },

    #[error("Failed to decode {type_name}: {source}")]
    Decode {
        type_name: &'static str,
        position: Option<Position>,
        #[source]
        source: BoxedSource,
    },
}

impl CodecError {
    /// Name of the Rust type being encoded or decoded
    pub fn type_name(&self) -> &'static str {
        match self {
            CodecError::Encode { type_name, .. } | CodecError::Decode { type_name, .. } => {
                type_name
            }
        }
    }

    /// Decode position, when the format reports one
    pub fn position(&self) -> Option<Position> {
        match self {
            CodecError::Encode { .. } => None,
            CodecError::Decode { position, .. } => *position,
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
