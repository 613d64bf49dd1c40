//! Persistence for the post collection.
//!
//! A store only knows how to read the whole collection and replace it. It
//! does no locking of its own; callers that mutate go through
//! [`crate::posts::PostService`], which serializes writers.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::{models::Post, Result};

#[async_trait]
pub trait PostStore: Send + Sync {
    /// The full collection in insertion order. An absent or blank backing
    /// document is an empty collection.
    async fn load(&self) -> Result<Vec<Post>>;

    /// Replaces the full collection.
    async fn save(&self, posts: &[Post]) -> Result<()>;
}
