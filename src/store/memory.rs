use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PostStore;
use crate::{models::Post, Result};

/// Volatile store, used by tests and throwaway servers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Post>> {
        Ok(self.posts.read().await.clone())
    }

    async fn save(&self, posts: &[Post]) -> Result<()> {
        *self.posts.write().await = posts.to_vec();
        Ok(())
    }
}
