//! Location + relative path to absolute path

use std::path::{Path, PathBuf};

use super::path::RelativePath;
use super::roots::{LocationRoots, StorageLocation};
use crate::errors::DiskResult;

/// Resolves location/path pairs against a fixed set of roots.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    roots: LocationRoots,
}

impl LocationResolver {
    pub fn new(roots: LocationRoots) -> Self {
        Self { roots }
    }

    /// Root directory of `location`
    pub fn root(&self, location: StorageLocation) -> &Path {
        self.roots.root(location)
    }

    /// Configured roots
    pub fn roots(&self) -> &LocationRoots {
        &self.roots
    }

    /// Resolve a raw path string.
    ///
    /// # Errors
    ///
    /// `InvalidPath` if `raw` is not a valid relative path.
    pub fn resolve(&self, location: StorageLocation, raw: &str) -> DiskResult<PathBuf> {
        let path = RelativePath::parse(raw)?;
        Ok(self.resolve_path(location, &path))
    }

    /// Resolve an already-validated path. Infallible.
    pub fn resolve_path(&self, location: StorageLocation, path: &RelativePath) -> PathBuf {
        self.roots.root(location).join(path.to_path_buf())
    }
}
