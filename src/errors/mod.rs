//! Error taxonomy for diskstore
//!
//! Every store operation returns exactly one outcome: a value or a
//! `DiskError` of one of six kinds. The kind is the only thing callers
//! should branch on; message, path, details and source exist for
//! diagnostics.
//!
//! Error codes:
//! - DISK_FILE_NOT_FOUND
//! - DISK_INVALID_PATH
//! - DISK_ENCODING_FAILED
//! - DISK_DECODING_FAILED
//! - DISK_WRITE_FAILED
//! - DISK_READ_FAILED

mod classify;

pub use classify::{classify_codec, classify_probe, classify_read, classify_write};

use std::fmt;
use std::path::{Path, PathBuf};

/// Boxed underlying cause kept for diagnostics
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of failure kinds surfaced by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskErrorKind {
    /// Target path has no backing file
    FileNotFound,
    /// Path escapes its root or is otherwise malformed
    InvalidPath,
    /// Value could not be serialized
    EncodingFailed,
    /// Bytes are not well-formed for the requested type
    DecodingFailed,
    /// Underlying storage write failed
    WriteFailed,
    /// Underlying storage read failed for a reason other than absence
    ReadFailed,
}

impl DiskErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            DiskErrorKind::FileNotFound => "DISK_FILE_NOT_FOUND",
            DiskErrorKind::InvalidPath => "DISK_INVALID_PATH",
            DiskErrorKind::EncodingFailed => "DISK_ENCODING_FAILED",
            DiskErrorKind::DecodingFailed => "DISK_DECODING_FAILED",
            DiskErrorKind::WriteFailed => "DISK_WRITE_FAILED",
            DiskErrorKind::ReadFailed => "DISK_READ_FAILED",
        }
    }

    /// All kinds, in declaration order
    pub fn all() -> &'static [DiskErrorKind] {
        &[
            DiskErrorKind::FileNotFound,
            DiskErrorKind::InvalidPath,
            DiskErrorKind::EncodingFailed,
            DiskErrorKind::DecodingFailed,
            DiskErrorKind::WriteFailed,
            DiskErrorKind::ReadFailed,
        ]
    }
}

impl fmt::Display for DiskErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with full diagnostic context
#[derive(Debug)]
pub struct DiskError {
    kind: DiskErrorKind,
    message: String,
    path: Option<PathBuf>,
    details: Option<String>,
    source: Option<BoxedSource>,
}

impl DiskError {
    /// Create an error of the given kind
    pub fn new(kind: DiskErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
            details: None,
            source: None,
        }
    }

    /// No file exists at `path`
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(DiskErrorKind::FileNotFound, "No file found at path").with_path(path)
    }

    /// A relative path was rejected by the resolver
    pub fn invalid_path(raw: &str, reason: impl Into<String>) -> Self {
        Self::new(DiskErrorKind::InvalidPath, reason).with_details(format!("input: {:?}", raw))
    }

    /// Write failure with an I/O cause
    pub fn write_failed(path: &Path, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::new(DiskErrorKind::WriteFailed, message)
            .with_path(path)
            .with_source(source)
    }

    /// Write refused without an underlying I/O error
    pub fn write_refused(path: &Path, message: impl Into<String>) -> Self {
        Self::new(DiskErrorKind::WriteFailed, message).with_path(path)
    }

    /// Read failure with an I/O cause
    pub fn read_failed(path: &Path, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::new(DiskErrorKind::ReadFailed, message)
            .with_path(path)
            .with_source(source)
    }

    /// Attach the absolute path involved
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Attach free-form details (offsets, io kinds)
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind
    pub fn kind(&self) -> DiskErrorKind {
        self.kind
    }

    /// Returns the string code of the kind
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the absolute path involved, if known
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns additional details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// True for `FileNotFound`
    pub fn is_not_found(&self) -> bool {
        self.kind == DiskErrorKind::FileNotFound
    }
}

impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)?;
        match (&self.path, &self.details) {
            (Some(path), Some(details)) => write!(f, " (path: {}; {})", path.display(), details),
            (Some(path), None) => write!(f, " (path: {})", path.display()),
            (None, Some(details)) => write!(f, " ({})", details),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type DiskResult<T> = Result<T, DiskError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_codes_are_distinct() {
        let mut codes: Vec<_> = DiskErrorKind::all().iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 6);
    }

    #[test]
    fn test_not_found_display() {
        let err = DiskError::file_not_found(Path::new("/data/documents/posts.json"));
        let display = err.to_string();
        assert!(display.contains("DISK_FILE_NOT_FOUND"));
        assert!(display.contains("/data/documents/posts.json"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_path_carries_input() {
        let err = DiskError::invalid_path("../etc/passwd", "Path escapes its storage root");
        assert_eq!(err.kind(), DiskErrorKind::InvalidPath);
        assert!(err.path().is_none());
        assert!(err.details().unwrap().contains("../etc/passwd"));
    }

    #[test]
    fn test_write_failed_exposes_source() {
        let err = DiskError::write_failed(
            Path::new("/tmp/x.json"),
            "Failed to write file",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(err.code(), "DISK_WRITE_FAILED");
        assert_eq!(err.source().unwrap().to_string(), "disk full");
    }

    #[test]
    fn test_display_with_path_and_details() {
        let err = DiskError::new(DiskErrorKind::DecodingFailed, "bad data")
            .with_path(Path::new("/a.json"))
            .with_details("line: 1, column: 2");
        assert_eq!(
            err.to_string(),
            "[DISK_DECODING_FAILED] bad data (path: /a.json; line: 1, column: 2)"
        );
    }
}
