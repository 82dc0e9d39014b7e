//! Store configuration
//!
//! Loaded from a JSON file and validated before any store is built:
//!
//! ```json
//! {
//!   "app_name": "diskstore",
//!   "root": "/var/lib/diskstore",
//!   "roots": { "caches": "/var/cache/diskstore" },
//!   "pretty": true,
//!   "fsync": true,
//!   "append_policy": "create_if_missing"
//! }
//! ```
//!
//! Every field is optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::JsonCodec;
use crate::location::{LocationRoots, StorageLocation};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{AppendPolicy, FileStore, StoreOptions};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Cannot determine a home directory for '{0}'; set \"root\" in the config")]
    NoHomeDirectory(String),
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_app_name() -> String {
    "diskstore".to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Application name used for system directories
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Base directory holding every location; system directories if unset
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Per-location absolute root overrides
    #[serde(default)]
    pub roots: BTreeMap<StorageLocation, PathBuf>,

    /// Pretty-print JSON
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// fsync files and directories on write
    #[serde(default = "default_true")]
    pub fsync: bool,

    /// Behaviour of append on a missing file
    #[serde(default)]
    pub append_policy: AppendPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            root: None,
            roots: BTreeMap::new(),
            pretty: true,
            fsync: true,
            append_policy: AppendPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StoreConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("app_name", &config.app_name),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Invalid("app_name must not be empty".into()));
        }
        if self.app_name.contains(['/', '\\']) || self.app_name == ".." {
            return Err(ConfigError::Invalid(format!(
                "app_name must not contain path separators: {}",
                self.app_name
            )));
        }
        for (location, path) in &self.roots {
            if !path.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "root override for {} must be absolute: {}",
                    location,
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Resolve the configured roots
    pub fn location_roots(&self) -> ConfigResult<LocationRoots> {
        let base = match &self.root {
            Some(root) => LocationRoots::under(root),
            None => LocationRoots::from_system(&self.app_name)
                .ok_or_else(|| ConfigError::NoHomeDirectory(self.app_name.clone()))?,
        };

        let roots = self
            .roots
            .iter()
            .fold(base, |roots, (location, path)| {
                roots.with_root(*location, path.clone())
            });

        if let Some((a, b)) = roots.overlapping().first() {
            return Err(ConfigError::Invalid(format!(
                "roots of {} and {} overlap",
                a, b
            )));
        }
        Ok(roots)
    }

    /// Store options derived from this config
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            append_policy: self.append_policy,
            sync: self.fsync,
        }
    }

    /// Build a ready JSON store
    pub fn build_store(&self) -> ConfigResult<FileStore<JsonCodec>> {
        let codec = if self.pretty {
            JsonCodec::pretty()
        } else {
            JsonCodec::compact()
        };
        Ok(FileStore::with_codec(self.location_roots()?, codec).with_options(self.store_options()))
    }
}
