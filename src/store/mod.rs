//! File store subsystem
//!
//! One file per key under a storage location. Writes go through a
//! temporary sibling and a rename so readers never observe partial
//! content; reads classify absence, I/O failure and corrupt data into
//! distinct error kinds.
//!
//! # Lifecycle of a stored file
//!
//! ```text
//! Absent  --save-->    Present
//! Present --save-->    Present   (replaced, never merged)
//! Present --append-->  Present   (collection re-encoded)
//! Absent  --append-->  Present   (AppendPolicy::CreateIfMissing)
//! Present --delete-->  Absent
//! ```
//!
//! `retrieve`, `exists` and `list` never change state.

mod atomic;
mod file_store;
mod options;

pub use file_store::FileStore;
pub use options::{AppendPolicy, DeleteMode, StoreOptions};
