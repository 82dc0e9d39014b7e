//! Fault injection for testing write durability
//!
//! A store built with [`FileStore::with_fault_point`] makes its atomic
//! writer fail with an injected I/O error at the named step. Nothing is
//! injected unless a point is set. The binary arms a point from the
//! `DISKSTORE_FAULT_POINT` environment variable.
//!
//! ```ignore
//! use diskstore::fault_point::FaultPoint;
//!
//! let store = store.with_fault_point(FaultPoint::PartialWrite);
//! assert!(store.save(StorageLocation::Documents, "a.json", &value).is_err());
//! ```
//!
//! [`FileStore::with_fault_point`]: crate::store::FileStore::with_fault_point

use std::env;
use std::fmt;
use std::io;
use std::str::FromStr;

/// Steps of the atomic write at which a fault can be injected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// Half of the bytes reach the temporary file, then the write fails
    PartialWrite,
    /// All bytes written, fsync fails
    BeforeSync,
    /// Temporary file complete and synced, rename fails
    BeforeRename,
    /// Rename done, parent directory fsync fails
    AfterRename,
}

/// Environment variable naming a fault point for the binary
pub const FAULT_POINT_ENV: &str = "DISKSTORE_FAULT_POINT";

impl FaultPoint {
    /// Returns the point name
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultPoint::PartialWrite => "partial_write",
            FaultPoint::BeforeSync => "before_sync",
            FaultPoint::BeforeRename => "before_rename",
            FaultPoint::AfterRename => "after_rename",
        }
    }

    /// Whether a fault here leaves the previous content in place
    pub fn aborts_write(&self) -> bool {
        !matches!(self, FaultPoint::AfterRename)
    }

    /// Fault point named by `DISKSTORE_FAULT_POINT`, if set
    pub fn from_env() -> Result<Option<FaultPoint>, String> {
        match env::var(FAULT_POINT_ENV) {
            Ok(name) if name.is_empty() => Ok(None),
            Ok(name) => name.parse().map(Some),
            Err(_) => Ok(None),
        }
    }

    /// All defined fault points
    pub fn all() -> &'static [FaultPoint] {
        &[
            FaultPoint::PartialWrite,
            FaultPoint::BeforeSync,
            FaultPoint::BeforeRename,
            FaultPoint::AfterRename,
        ]
    }
}

impl fmt::Display for FaultPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FaultPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaultPoint::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown fault point '{}'", s))
    }
}

/// Fail with an injected error if `armed` is `at`
#[inline]
pub(crate) fn trip(armed: Option<FaultPoint>, at: FaultPoint) -> io::Result<()> {
    if armed == Some(at) {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("injected fault at {}", at),
        ));
    }
    Ok(())
}
