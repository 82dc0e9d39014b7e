//! Location resolution
//!
//! A file is addressed by a [`StorageLocation`] (which root directory
//! class) plus a [`RelativePath`] under it. [`LocationResolver`] turns the
//! pair into an absolute path. Resolution is pure: it never touches the
//! filesystem. Parent directories are created by the store at write time.

mod path;
mod resolver;
mod roots;

pub use path::RelativePath;
pub use resolver::LocationResolver;
pub use roots::{LocationRoots, StorageLocation};
