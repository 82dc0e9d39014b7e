//! Reference record type and the posts workflow
//!
//! A `Post` is what the demo caller persists. The workflow functions take
//! the caller's post list explicitly; nothing here keeps state between
//! calls.

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::errors::DiskResult;
use crate::location::StorageLocation;
use crate::store::FileStore;

/// File the posts workflow reads and writes
pub const POSTS_FILE: &str = "posts.json";

/// Location the posts workflow uses
pub const POSTS_LOCATION: StorageLocation = StorageLocation::Documents;

/// Message shown when nothing has been saved yet
pub const NO_POSTS_MESSAGE: &str = "No file saved to disk yet!";

/// A post, as served by a typical JSON placeholder API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Owner reference; not checked against anything
    pub user_id: i64,
    /// Unique within the owning collection
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn new(user_id: i64, id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id,
            id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// `"<id>: <title>\n<body>\n"`
    pub fn summary(&self) -> String {
        format!("{}: {}\n{}\n", self.id, self.title, self.body)
    }
}

/// Offline stand-in for fetching posts over the network
pub fn sample_posts() -> Vec<Post> {
    vec![
        Post::new(0, 1, "A", "x"),
        Post::new(0, 2, "B", "y"),
    ]
}

/// The post appended after every save
pub fn appended_post(existing: &[Post]) -> Post {
    Post::new(0, existing.len() as i64 + 1, "Appended Post", "...")
}

/// Save `posts` as the collection, then append one more post.
///
/// Returns the post that was appended.
pub fn save_posts<C: Codec>(store: &FileStore<C>, posts: &[Post]) -> DiskResult<Post> {
    store.save(POSTS_LOCATION, POSTS_FILE, posts)?;
    let extra = appended_post(posts);
    store.append(POSTS_LOCATION, POSTS_FILE, extra.clone())?;
    Ok(extra)
}

/// Retrieve the saved posts
pub fn load_posts<C: Codec>(store: &FileStore<C>) -> DiskResult<Vec<Post>> {
    store.retrieve(POSTS_LOCATION, POSTS_FILE)
}

/// Render posts the way the demo displays them
pub fn render_posts(posts: &[Post]) -> String {
    posts
        .iter()
        .map(|p| format!("{}\n", p.summary()))
        .collect()
}
