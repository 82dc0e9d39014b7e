//! The file store: typed save / retrieve / append over resolved paths

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::atomic::{self, AtomicWriter};
use super::options::{AppendPolicy, DeleteMode, StoreOptions};
use crate::codec::{Codec, CodecError, JsonCodec};
use crate::errors::{
    classify_codec, classify_probe, classify_read, classify_write, DiskError, DiskResult,
};
use crate::fault_point::FaultPoint;
use crate::location::{LocationResolver, LocationRoots, RelativePath, StorageLocation};
use crate::observability::{log_event_with_fields, Event};

/// Typed, file-per-key persistence under storage locations.
///
/// The store holds no mutable state between calls. Every operation
/// resolves its path, does its I/O synchronously, and returns one
/// outcome. Callers sharing a path across threads must serialize access
/// to it themselves.
#[derive(Debug, Clone)]
pub struct FileStore<C: Codec = JsonCodec> {
    resolver: LocationResolver,
    codec: C,
    options: StoreOptions,
    fault: Option<FaultPoint>,
}

impl FileStore<JsonCodec> {
    /// Store with pretty JSON and default options
    pub fn new(roots: LocationRoots) -> Self {
        Self::with_codec(roots, JsonCodec::default())
    }
}

impl<C: Codec> FileStore<C> {
    /// Store with a specific codec
    pub fn with_codec(roots: LocationRoots, codec: C) -> Self {
        log_event_with_fields(
            Event::StoreOpened,
            &[(
                "documents",
                &roots.root(StorageLocation::Documents).display().to_string(),
            )],
        );
        Self {
            resolver: LocationResolver::new(roots),
            codec,
            options: StoreOptions::default(),
            fault: None,
        }
    }

    /// Replace the store options
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Arm a fault point in the atomic writer
    pub fn with_fault_point(mut self, point: FaultPoint) -> Self {
        self.fault = Some(point);
        self
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Absolute path a location/path pair resolves to
    pub fn path_of(&self, location: StorageLocation, path: &str) -> DiskResult<PathBuf> {
        self.resolver.resolve(location, path)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Encode `value` and atomically replace the file at `path`.
    ///
    /// # Errors
    ///
    /// `InvalidPath`, `EncodingFailed`, or `WriteFailed`.
    pub fn save<T>(&self, location: StorageLocation, path: &str, value: &T) -> DiskResult<()>
    where
        T: Serialize + ?Sized,
    {
        let target = self.resolver.resolve(location, path)?;
        let bytes = self
            .codec
            .encode(value)
            .map_err(|e| classify_codec(&target, e))?;
        self.write(location, &target, &bytes)
    }

    /// Atomically replace the file at `path` with raw bytes
    pub fn save_bytes(&self, location: StorageLocation, path: &str, bytes: &[u8]) -> DiskResult<()> {
        let target = self.resolver.resolve(location, path)?;
        self.write(location, &target, bytes)
    }

    /// Append one element to the collection stored at `path`.
    ///
    /// The whole collection is decoded, extended and re-written through
    /// the same atomic path as [`save`](Self::save). A missing file is
    /// handled per [`AppendPolicy`].
    ///
    /// # Errors
    ///
    /// `DecodingFailed` if the file is not a collection of `T`;
    /// `FileNotFound` under `FailIfMissing`; otherwise as `save`.
    pub fn append<T>(&self, location: StorageLocation, path: &str, value: T) -> DiskResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.append_all(location, path, std::iter::once(value))
    }

    /// Append several elements in one re-encode
    pub fn append_all<T, I>(&self, location: StorageLocation, path: &str, values: I) -> DiskResult<()>
    where
        T: Serialize + DeserializeOwned,
        I: IntoIterator<Item = T>,
    {
        let target = self.resolver.resolve(location, path)?;

        let mut items: Vec<T> = match fs::read(&target) {
            Ok(bytes) => self
                .codec
                .decode_collection(&bytes)
                .map_err(|e| self.decode_failed(&target, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => match self.options.append_policy {
                AppendPolicy::CreateIfMissing => Vec::new(),
                AppendPolicy::FailIfMissing => return Err(classify_read(&target, e)),
            },
            Err(e) => return Err(classify_read(&target, e)),
        };

        let existing = items.len();
        items.extend(values);

        let bytes = self
            .codec
            .encode_collection(&items)
            .map_err(|e| classify_codec(&target, e))?;
        self.writer().write(&target, &bytes)?;

        log_event_with_fields(
            Event::FileAppended,
            &[
                ("location", location.as_str()),
                ("path", &target.display().to_string()),
                ("added", &(items.len() - existing).to_string()),
                ("total", &items.len().to_string()),
            ],
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Read and decode the file at `path`.
    ///
    /// Never returns a default value for a missing file.
    ///
    /// # Errors
    ///
    /// `InvalidPath`, `FileNotFound`, `ReadFailed`, or `DecodingFailed`.
    pub fn retrieve<T>(&self, location: StorageLocation, path: &str) -> DiskResult<T>
    where
        T: DeserializeOwned,
    {
        let target = self.resolver.resolve(location, path)?;
        let bytes = fs::read(&target).map_err(|e| classify_read(&target, e))?;
        let value = self
            .codec
            .decode(&bytes)
            .map_err(|e| self.decode_failed(&target, e))?;

        log_event_with_fields(
            Event::FileRetrieved,
            &[
                ("location", location.as_str()),
                ("path", &target.display().to_string()),
                ("bytes", &bytes.len().to_string()),
            ],
        );
        Ok(value)
    }

    /// Read the raw bytes at `path`
    pub fn retrieve_bytes(&self, location: StorageLocation, path: &str) -> DiskResult<Vec<u8>> {
        let target = self.resolver.resolve(location, path)?;
        fs::read(&target).map_err(|e| classify_read(&target, e))
    }

    /// Whether a regular file exists at `path`.
    ///
    /// # Errors
    ///
    /// `InvalidPath`, or `ReadFailed` when the path cannot be inspected
    /// for lack of permission.
    pub fn exists(&self, location: StorageLocation, path: &str) -> DiskResult<bool> {
        let target = self.resolver.resolve(location, path)?;
        match fs::metadata(&target) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(classify_probe(&target, e))
            }
            Err(_) => Ok(false),
        }
    }

    /// Relative paths of the regular files directly inside `dir` (the
    /// location root when `None`), sorted. A missing directory is empty.
    pub fn list(&self, location: StorageLocation, dir: Option<&str>) -> DiskResult<Vec<String>> {
        let (base, prefix) = match dir {
            Some(raw) => {
                let rel = RelativePath::parse(raw)?;
                (
                    self.resolver.resolve_path(location, &rel),
                    Some(rel.to_string()),
                )
            }
            None => (self.resolver.root(location).to_path_buf(), None),
        };

        let entries = match fs::read_dir(&base) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(classify_read(&base, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| classify_read(&base, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| classify_probe(&entry.path(), e))?
                .is_file();
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if atomic::is_temp_artifact(name) {
                    continue;
                }
                names.push(match &prefix {
                    Some(p) => format!("{}/{}", p, name),
                    None => name.to_string(),
                });
            }
        }

        names.sort();
        Ok(names)
    }

    // ------------------------------------------------------------------
    // Removal and relocation
    // ------------------------------------------------------------------

    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// `FileNotFound` for a missing file in `Strict` mode; `WriteFailed`
    /// if removal fails.
    pub fn delete(&self, location: StorageLocation, path: &str, mode: DeleteMode) -> DiskResult<()> {
        let target = self.resolver.resolve(location, path)?;

        match fs::remove_file(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return match mode {
                    DeleteMode::Lenient => Ok(()),
                    DeleteMode::Strict => Err(classify_read(&target, e)),
                };
            }
            Err(e) => return Err(classify_write(&target, "Failed to remove file", e)),
        }

        log_event_with_fields(
            Event::FileDeleted,
            &[
                ("location", location.as_str()),
                ("path", &target.display().to_string()),
            ],
        );
        Ok(())
    }

    /// Move a file between location/path pairs, preserving its bytes.
    ///
    /// All-or-nothing: the source is only gone once the destination is
    /// complete. Refuses to overwrite an existing destination.
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the source is absent; `WriteFailed` if the
    /// destination exists or cannot be written.
    pub fn move_file(
        &self,
        from_location: StorageLocation,
        from: &str,
        to_location: StorageLocation,
        to: &str,
    ) -> DiskResult<()> {
        let source = self.resolver.resolve(from_location, from)?;
        let dest = self.resolver.resolve(to_location, to)?;

        match fs::metadata(&source) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(DiskError::file_not_found(&source)
                    .with_details("path is not a regular file"))
            }
            Err(e) => return Err(classify_read(&source, e)),
        }

        if source == dest {
            return Ok(());
        }

        if fs::symlink_metadata(&dest).is_ok() {
            return Err(DiskError::write_refused(&dest, "Destination already exists"));
        }

        let dest_parent = dest
            .parent()
            .ok_or_else(|| DiskError::write_refused(&dest, "Destination has no parent directory"))?;
        atomic::create_parent_dirs(dest_parent)?;

        if fs::rename(&source, &dest).is_err() {
            // e.g. roots on different filesystems
            self.copy_then_remove(&source, &dest)?;
        } else if self.options.sync {
            // The move has happened; only its durability is in doubt
            if let Err(e) = atomic::fsync_dir(dest_parent) {
                atomic::log_unsynced(&dest, &e);
            }
        }

        log_event_with_fields(
            Event::FileMoved,
            &[
                ("from", &source.display().to_string()),
                ("to", &dest.display().to_string()),
            ],
        );
        Ok(())
    }

    /// Move a file to a new path within the same location
    pub fn rename(&self, location: StorageLocation, from: &str, to: &str) -> DiskResult<()> {
        self.move_file(location, from, location, to)
    }

    /// Remove everything under the root of `location`, keeping the root
    pub fn clear(&self, location: StorageLocation) -> DiskResult<()> {
        let root = self.resolver.root(location);

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(classify_read(root, e)),
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| classify_read(root, e))?;
            let path = entry.path();
            let is_dir = entry
                .file_type()
                .map_err(|e| classify_probe(&path, e))?
                .is_dir();
            let result = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| classify_write(&path, "Failed to remove entry", e))?;
            removed += 1;
        }

        log_event_with_fields(
            Event::LocationCleared,
            &[
                ("location", location.as_str()),
                ("removed", &removed.to_string()),
            ],
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn writer(&self) -> AtomicWriter {
        AtomicWriter::new(self.options.sync, self.fault)
    }

    fn write(&self, location: StorageLocation, target: &Path, bytes: &[u8]) -> DiskResult<()> {
        self.writer().write(target, bytes)?;
        log_event_with_fields(
            Event::FileSaved,
            &[
                ("location", location.as_str()),
                ("path", &target.display().to_string()),
                ("bytes", &bytes.len().to_string()),
            ],
        );
        Ok(())
    }

    fn copy_then_remove(&self, source: &Path, dest: &Path) -> DiskResult<()> {
        let bytes = fs::read(source).map_err(|e| classify_read(source, e))?;
        self.writer().write(dest, &bytes)?;

        if let Err(e) = fs::remove_file(source) {
            // Roll back so the file exists in exactly one place
            let _ = fs::remove_file(dest);
            return Err(classify_write(
                source,
                "Failed to remove source after copy (rolled back)",
                e,
            ));
        }
        Ok(())
    }

    fn decode_failed(&self, target: &Path, err: CodecError) -> DiskError {
        let err = classify_codec(target, err);
        log_event_with_fields(
            Event::DecodeFailed,
            &[
                ("path", &target.display().to_string()),
                ("details", err.details().unwrap_or_default()),
            ],
        );
        err
    }
}
