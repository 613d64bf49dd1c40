mod post;

pub use post::{Author, NewPost, Post, PostUpdate};

use serde::{Deserialize, Serialize};

/// One page of the list endpoint: the requested window plus the size of the
/// whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPage {
    pub blogs: Vec<Post>,
    pub total: usize,
}

impl BlogPage {
    pub fn page_count(&self, limit: usize) -> usize {
        crate::pagination::page_count(self.total, limit)
    }
}
