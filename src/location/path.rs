//! Normalized relative paths

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::errors::{DiskError, DiskResult};

/// A validated path under a storage root.
///
/// Always holds at least one component, never `.` or `..`, and never
/// anything that could climb above the root it is joined to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    components: Vec<String>,
}

impl RelativePath {
    /// Parse and normalize a caller-supplied path string.
    ///
    /// `\` counts as a separator, empty and `.` components are dropped,
    /// and `..` consumes the previous component.
    ///
    /// # Errors
    ///
    /// `InvalidPath` for absolute paths, NUL bytes, a component the
    /// platform reads as anything but a plain name (such as a drive prefix
    /// on Windows), a `..` that climbs above the root, or a path that
    /// normalizes to nothing.
    pub fn parse(raw: &str) -> DiskResult<Self> {
        if raw.contains('\0') {
            return Err(DiskError::invalid_path(raw, "Path contains a NUL byte"));
        }

        let unified = raw.replace('\\', "/");
        if unified.starts_with('/') {
            return Err(DiskError::invalid_path(
                raw,
                "Path must be relative to its storage location",
            ));
        }

        let mut components: Vec<String> = Vec::new();
        for part in unified.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if components.pop().is_none() {
                        return Err(DiskError::invalid_path(
                            raw,
                            "Path escapes its storage location",
                        ));
                    }
                }
                other if is_plain_name(other) => components.push(other.to_string()),
                _ => {
                    return Err(DiskError::invalid_path(
                        raw,
                        "Path must be relative to its storage location",
                    ))
                }
            }
        }

        if components.is_empty() {
            return Err(DiskError::invalid_path(raw, "Path does not name a file"));
        }

        Ok(Self { components })
    }

    /// Platform path to join onto a root
    pub fn to_path_buf(&self) -> PathBuf {
        self.components.iter().collect()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl std::str::FromStr for RelativePath {
    type Err = DiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A component that pushes onto a path as exactly one normal name
fn is_plain_name(part: &str) -> bool {
    let mut parsed = Path::new(part).components();
    matches!(
        (parsed.next(), parsed.next()),
        (Some(Component::Normal(_)), None)
    )
}
