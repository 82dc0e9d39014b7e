//! Storage location tags and their root directories

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Root directory class a file lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageLocation {
    /// User documents; kept until the user deletes them
    Documents,
    /// Re-creatable data the system may purge
    Caches,
    /// Scratch data
    Temporary,
    /// Application-owned support files
    ApplicationSupport,
    /// Container shared with companion apps
    #[serde(rename = "shared", alias = "sharedContainer")]
    SharedContainer,
}

impl StorageLocation {
    /// Returns the canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Documents => "documents",
            StorageLocation::Caches => "caches",
            StorageLocation::Temporary => "temporary",
            StorageLocation::ApplicationSupport => "applicationSupport",
            StorageLocation::SharedContainer => "shared",
        }
    }

    /// Subdirectory used when all locations share one base directory
    fn dir_name(&self) -> &'static str {
        match self {
            StorageLocation::Documents => "documents",
            StorageLocation::Caches => "caches",
            StorageLocation::Temporary => "tmp",
            StorageLocation::ApplicationSupport => "support",
            StorageLocation::SharedContainer => "shared",
        }
    }

    /// All locations, in declaration order
    pub fn all() -> &'static [StorageLocation] {
        &[
            StorageLocation::Documents,
            StorageLocation::Caches,
            StorageLocation::Temporary,
            StorageLocation::ApplicationSupport,
            StorageLocation::SharedContainer,
        ]
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "documents" => Ok(StorageLocation::Documents),
            "caches" => Ok(StorageLocation::Caches),
            "temporary" | "tmp" => Ok(StorageLocation::Temporary),
            "applicationsupport" | "support" => Ok(StorageLocation::ApplicationSupport),
            "shared" | "sharedcontainer" => Ok(StorageLocation::SharedContainer),
            _ => Err(format!(
                "unknown storage location '{}' (expected documents, caches, temporary, applicationSupport or shared)",
                s
            )),
        }
    }
}

/// Absolute root directory for every storage location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRoots {
    documents: PathBuf,
    caches: PathBuf,
    temporary: PathBuf,
    application_support: PathBuf,
    shared: PathBuf,
}

impl LocationRoots {
    /// Place every location in its own subdirectory of `base`
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            documents: base.join(StorageLocation::Documents.dir_name()),
            caches: base.join(StorageLocation::Caches.dir_name()),
            temporary: base.join(StorageLocation::Temporary.dir_name()),
            application_support: base.join(StorageLocation::ApplicationSupport.dir_name()),
            shared: base.join(StorageLocation::SharedContainer.dir_name()),
        }
    }

    /// Derive roots from the per-user OS directories for `app_name`.
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn from_system(app_name: &str) -> Option<Self> {
        let dirs = ProjectDirs::from("", "", app_name)?;
        Some(Self {
            documents: dirs.data_dir().join("documents"),
            caches: dirs.cache_dir().to_path_buf(),
            temporary: env::temp_dir().join(app_name),
            application_support: dirs.data_local_dir().join("support"),
            shared: dirs.data_dir().join("shared"),
        })
    }

    /// Replace the root of one location
    pub fn with_root(mut self, location: StorageLocation, root: impl Into<PathBuf>) -> Self {
        *self.slot(location) = root.into();
        self
    }

    /// Root directory of `location`
    pub fn root(&self, location: StorageLocation) -> &Path {
        match location {
            StorageLocation::Documents => &self.documents,
            StorageLocation::Caches => &self.caches,
            StorageLocation::Temporary => &self.temporary,
            StorageLocation::ApplicationSupport => &self.application_support,
            StorageLocation::SharedContainer => &self.shared,
        }
    }

    fn slot(&mut self, location: StorageLocation) -> &mut PathBuf {
        match location {
            StorageLocation::Documents => &mut self.documents,
            StorageLocation::Caches => &mut self.caches,
            StorageLocation::Temporary => &mut self.temporary,
            StorageLocation::ApplicationSupport => &mut self.application_support,
            StorageLocation::SharedContainer => &mut self.shared,
        }
    }

    /// Pairs of locations whose roots are equal or nested.
    ///
    /// Overlapping roots would let two location/path pairs name the same
    /// file.
    pub fn overlapping(&self) -> Vec<(StorageLocation, StorageLocation)> {
        let mut pairs = Vec::new();
        let all = StorageLocation::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                let (ra, rb) = (self.root(*a), self.root(*b));
                if ra.starts_with(rb) || rb.starts_with(ra) {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}
