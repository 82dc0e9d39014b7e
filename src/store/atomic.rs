//! Atomic file replacement
//!
//! A write never exposes partial content at the target path:
//!
//! 1. Create missing parent directories
//! 2. Write bytes to `.<name>.<uuid>.tmp` in the same directory, with
//!    `<name>` cut to at most 64 bytes
//! 3. fsync the temporary file
//! 4. Rename it over the target
//! 5. fsync the parent directory
//!
//! A failure at any step before the rename removes the temporary file and
//! leaves the previous target content untouched. Once the rename is done
//! the write is committed: a failed directory fsync is logged, not
//! returned, so a caller never retries a write that already happened.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{classify_write, DiskError, DiskResult};
use crate::fault_point::{self, FaultPoint};
use crate::observability::{log_event_with_fields, Event};

const TEMP_SUFFIX: &str = ".tmp";

/// Bytes of the target name kept in a temporary name
pub(crate) const TEMP_NAME_PREFIX_MAX: usize = 64;

/// Writes whole files through a temporary sibling and a rename
#[derive(Debug, Clone, Copy)]
pub(crate) struct AtomicWriter {
    sync: bool,
    fault: Option<FaultPoint>,
}

impl AtomicWriter {
    pub(crate) fn new(sync: bool, fault: Option<FaultPoint>) -> Self {
        Self { sync, fault }
    }

    /// Replace `target` with `bytes`
    pub(crate) fn write(&self, target: &Path, bytes: &[u8]) -> DiskResult<()> {
        let parent = parent_of(target)?;
        create_parent_dirs(parent)?;

        if target.is_dir() {
            return Err(DiskError::write_refused(
                target,
                "A directory exists at the target path",
            ));
        }

        let temp = temp_path_for(target);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)
            .map_err(|e| classify_write(&temp, "Failed to create temporary file", e))?;

        let filled = self.fill(&mut file, &temp, bytes);
        drop(file);

        if let Err(e) = filled.and_then(|_| self.swap(&temp, target)) {
            discard(&temp, &e);
            return Err(e);
        }

        let synced = fault_point::trip(self.fault, FaultPoint::AfterRename)
            .map_err(|e| classify_write(parent, "Failed to fsync directory", e))
            .and_then(|_| if self.sync { fsync_dir(parent) } else { Ok(()) });
        if let Err(e) = synced {
            log_unsynced(target, &e);
        }

        Ok(())
    }

    fn fill(&self, file: &mut File, temp: &Path, bytes: &[u8]) -> DiskResult<()> {
        let written = if self.fault == Some(FaultPoint::PartialWrite) {
            file.write_all(&bytes[..bytes.len() / 2])
                .and_then(|_| fault_point::trip(self.fault, FaultPoint::PartialWrite))
        } else {
            file.write_all(bytes)
        };
        written.map_err(|e| classify_write(temp, "Failed to write temporary file", e))?;

        file.flush()
            .map_err(|e| classify_write(temp, "Failed to flush temporary file", e))?;

        fault_point::trip(self.fault, FaultPoint::BeforeSync)
            .map_err(|e| classify_write(temp, "Failed to fsync temporary file", e))?;

        if self.sync {
            file.sync_all()
                .map_err(|e| classify_write(temp, "Failed to fsync temporary file", e))?;
        }

        Ok(())
    }

    fn swap(&self, temp: &Path, target: &Path) -> DiskResult<()> {
        fault_point::trip(self.fault, FaultPoint::BeforeRename)
            .and_then(|_| fs::rename(temp, target))
            .map_err(|e| classify_write(target, "Failed to move temporary file into place", e))
    }
}

/// Create `dir` and any missing ancestors
pub(crate) fn create_parent_dirs(dir: &Path) -> DiskResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| {
        classify_write(dir, "Failed to create parent directories", e)
    })
}

/// fsync a directory so a rename or unlink inside it is durable
#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> DiskResult<()> {
    let handle = File::open(dir)
        .map_err(|e| classify_write(dir, "Failed to open directory for fsync", e))?;
    handle
        .sync_all()
        .map_err(|e| classify_write(dir, "Failed to fsync directory", e))
}

#[cfg(not(unix))]
pub(crate) fn fsync_dir(_dir: &Path) -> DiskResult<()> {
    Ok(())
}

/// Record a committed write whose directory entry may not be durable yet
pub(crate) fn log_unsynced(target: &Path, cause: &DiskError) {
    log_event_with_fields(
        Event::DirSyncFailed,
        &[
            ("path", &target.display().to_string()),
            ("reason", cause.message()),
        ],
    );
}

/// True only for names produced by [`temp_path_for`]
pub(crate) fn is_temp_artifact(name: &str) -> bool {
    let inner = match name
        .strip_prefix('.')
        .and_then(|n| n.strip_suffix(TEMP_SUFFIX))
    {
        Some(inner) => inner,
        None => return false,
    };
    match inner.rsplit_once('.') {
        Some((prefix, id)) => {
            !prefix.is_empty()
                && id.len() == 32
                && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        }
        None => false,
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(
        ".{}.{}{}",
        truncate_name(&name, TEMP_NAME_PREFIX_MAX),
        Uuid::new_v4().simple(),
        TEMP_SUFFIX
    ))
}

/// Longest prefix of `name` within `max` bytes, on a char boundary
fn truncate_name(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn parent_of(target: &Path) -> DiskResult<&Path> {
    target
        .parent()
        .ok_or_else(|| DiskError::write_refused(target, "Target path has no parent directory"))
}

fn discard(temp: &Path, cause: &DiskError) {
    // Best effort: the temp file may never have been created
    let _ = fs::remove_file(temp);
    log_event_with_fields(
        Event::WriteAborted,
        &[
            ("path", &temp.display().to_string()),
            ("reason", cause.message()),
        ],
    );
}
