//! Store behaviour switches

use serde::{Deserialize, Serialize};

/// What `append` does when the target file does not exist yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendPolicy {
    /// Write a new collection holding only the appended elements
    #[default]
    CreateIfMissing,
    /// Report `FileNotFound`
    FailIfMissing,
}

/// How `delete` treats a missing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Absence is success
    #[default]
    Lenient,
    /// Absence is `FileNotFound`
    Strict,
}

/// Options fixed for the lifetime of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Missing-file behaviour of `append`
    pub append_policy: AppendPolicy,
    /// fsync written files and their parent directories
    pub sync: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            append_policy: AppendPolicy::CreateIfMissing,
            sync: true,
        }
    }
}
