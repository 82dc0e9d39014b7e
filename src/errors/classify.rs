//! Maps filesystem and codec failures into the closed taxonomy.

use std::io;
use std::path::Path;

use super::{DiskError, DiskErrorKind};
use crate::codec::CodecError;

/// Classify a failure while reading an existing (or expected) file.
///
/// Absence becomes `FileNotFound`; everything else is `ReadFailed`.
pub fn classify_read(path: &Path, err: io::Error) -> DiskError {
    if err.kind() == io::ErrorKind::NotFound {
        return DiskError::file_not_found(path).with_source(err);
    }
    let details = io_details(&err);
    DiskError::read_failed(path, "Failed to read file", err).with_details(details)
}

/// Classify a failure while creating, writing, syncing or renaming.
pub fn classify_write(path: &Path, context: &str, err: io::Error) -> DiskError {
    let details = io_details(&err);
    DiskError::write_failed(path, context, err).with_details(details)
}

/// Classify a failure while probing for existence.
///
/// Callers handle `NotFound` themselves; whatever reaches here is a
/// permission or device problem.
pub fn classify_probe(path: &Path, err: io::Error) -> DiskError {
    let details = io_details(&err);
    DiskError::read_failed(path, "Failed to inspect path", err).with_details(details)
}

/// Classify a codec failure for the file at `path`.
pub fn classify_codec(path: &Path, err: CodecError) -> DiskError {
    let (kind, message) = match err {
        CodecError::Encode { .. } => (DiskErrorKind::EncodingFailed, "Failed to encode value"),
        CodecError::Decode { .. } => (
            DiskErrorKind::DecodingFailed,
            "File contents are not valid for the requested type",
        ),
    };

    let mut details = format!("type: {}", err.type_name());
    if let Some(pos) = err.position() {
        details.push_str(&format!(
            ", line: {}, column: {}, byte_offset: {}",
            pos.line, pos.column, pos.byte_offset
        ));
    }

    DiskError::new(kind, message)
        .with_path(path)
        .with_details(details)
        .with_source(err)
}

fn io_details(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => format!("io_kind: {}, os_error: {}", err.kind(), code),
        None => format!("io_kind: {}", err.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Codec, JsonCodec};

    #[test]
    fn test_read_not_found_is_file_not_found() {
        let err = classify_read(
            Path::new("/x/posts.json"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), DiskErrorKind::FileNotFound);
        assert_eq!(err.path(), Some(Path::new("/x/posts.json")));
    }

    #[test]
    fn test_read_permission_is_read_failed() {
        let err = classify_read(
            Path::new("/x/posts.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), DiskErrorKind::ReadFailed);
        assert!(err.details().unwrap().contains("permission denied"));
    }

    #[test]
    fn test_write_is_always_write_failed() {
        for kind in [
            io::ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied,
            io::ErrorKind::Other,
        ] {
            let err = classify_write(Path::new("/x"), "Failed to write", io::Error::new(kind, "e"));
            assert_eq!(err.kind(), DiskErrorKind::WriteFailed);
        }
    }

    #[test]
    fn test_probe_is_read_failed() {
        let err = classify_probe(
            Path::new("/x"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), DiskErrorKind::ReadFailed);
    }

    #[test]
    fn test_decode_error_carries_position() {
        let codec_err = JsonCodec::default()
            .decode::<Vec<u32>>(b"[1, 2, \"three\"]")
            .unwrap_err();
        let err = classify_codec(Path::new("/x/n.json"), codec_err);

        assert_eq!(err.kind(), DiskErrorKind::DecodingFailed);
        let details = err.details().unwrap();
        assert!(details.contains("line: 1"));
        assert!(details.contains("byte_offset"));
        assert!(details.contains("Vec<u32>"));
    }

    #[test]
    fn test_encode_error_is_encoding_failed() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1u8);
        let codec_err = JsonCodec::default().encode(&map).unwrap_err();
        let err = classify_codec(Path::new("/x/m.json"), codec_err);
        assert_eq!(err.kind(), DiskErrorKind::EncodingFailed);
    }
}
