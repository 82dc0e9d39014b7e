//! diskstore - typed, file-backed persistence for structured records
//!
//! Values are encoded (JSON by default) and written one file per key
//! under a storage location such as documents or caches:
//!
//! ```no_run
//! use diskstore::{FileStore, LocationRoots, StorageLocation};
//! use diskstore::post::Post;
//!
//! # fn main() -> diskstore::DiskResult<()> {
//! let store = FileStore::new(LocationRoots::under("/var/lib/myapp"));
//! let posts = vec![Post::new(0, 1, "A", "x"), Post::new(0, 2, "B", "y")];
//!
//! store.save(StorageLocation::Documents, "posts.json", &posts)?;
//! store.append(StorageLocation::Documents, "posts.json", Post::new(0, 3, "C", "z"))?;
//!
//! let back: Vec<Post> = store.retrieve(StorageLocation::Documents, "posts.json")?;
//! assert_eq!(back.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Every operation returns a `DiskResult`; the kind of a `DiskError`
//! tells apart a missing file, corrupt data, and I/O failure.

pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod fault_point;
pub mod location;
pub mod observability;
pub mod post;
pub mod store;

pub use codec::{Codec, CodecError, JsonCodec};
pub use config::{ConfigError, StoreConfig};
pub use errors::{DiskError, DiskErrorKind, DiskResult};
pub use location::{LocationResolver, LocationRoots, RelativePath, StorageLocation};
pub use store::{AppendPolicy, DeleteMode, FileStore, StoreOptions};
