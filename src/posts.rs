use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    models::{Author, BlogPage, NewPost, Post, PostUpdate},
    pagination::PageRequest,
    store::PostStore,
    Error, Result,
};

/// List/create/get/update/delete over a [`PostStore`].
///
/// Every load-mutate-save sequence runs under one writer lock, so concurrent
/// creates cannot overwrite each other's additions. Readers never take the
/// lock. The lock also guards the last issued id, which keeps ids unique even
/// when several posts are created within the same millisecond.
pub struct PostService {
    store: Arc<dyn PostStore>,
    writer: Mutex<u64>,
    default_author_email: String,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, default_author_email: impl Into<String>) -> Self {
        Self {
            store,
            writer: Mutex::new(0),
            default_author_email: default_author_email.into(),
        }
    }

    pub async fn list(&self, request: PageRequest) -> Result<BlogPage> {
        let posts = self.store.load().await?;
        let blogs = request.slice(&posts).to_vec();

        Ok(BlogPage {
            blogs,
            total: posts.len(),
        })
    }

    pub async fn get(&self, id: &str) -> Result<Post> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|post| post.id == id)
            .ok_or(Error::NotFound)
    }

    pub async fn create(&self, new_post: NewPost) -> Result<Post> {
        let title = required(new_post.title)?;
        let content = required(new_post.content)?;
        let author = match new_post.author_id.filter(|id| !id.trim().is_empty()) {
            Some(author_id) => Author::from_id(author_id),
            None => Author::with_default_email(&self.default_author_email),
        };

        let mut last_id = self.writer.lock().await;
        let mut posts = self.store.load().await?;

        let now = Utc::now();
        let id = next_id(&mut last_id, &posts, now.timestamp_millis())?;
        let post = Post {
            id: id.to_string(),
            title,
            content,
            author,
            created_at: now,
            updated_at: now,
        };

        posts.push(post.clone());
        self.store.save(&posts).await?;

        tracing::info!("Created post {} ({} total)", post.id, posts.len());
        Ok(post)
    }

    pub async fn update(&self, id: &str, update: PostUpdate) -> Result<Post> {
        if update.title.is_none() && update.content.is_none() {
            return Err(Error::missing_fields());
        }
        let title = update.title.map(|t| required(Some(t))).transpose()?;
        let content = update.content.map(|c| required(Some(c))).transpose()?;

        let _guard = self.writer.lock().await;
        let mut posts = self.store.load().await?;
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(Error::NotFound)?;

        if let Some(title) = title {
            post.title = title;
        }
        if let Some(content) = content {
            post.content = content;
        }
        post.updated_at = Utc::now().max(post.created_at);
        let updated = post.clone();

        self.store.save(&posts).await?;

        tracing::info!("Updated post {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.writer.lock().await;
        let mut posts = self.store.load().await?;

        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(Error::NotFound);
        }

        self.store.save(&posts).await?;

        tracing::info!("Deleted post {} ({} remaining)", id, posts.len());
        Ok(())
    }
}

fn required(value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::missing_fields()),
    }
}

/// Millisecond timestamp for a new post, bumped past every id already issued
/// or stored.
fn next_id(last_id: &mut u64, posts: &[Post], now_millis: i64) -> Result<u64> {
    let stored = posts
        .iter()
        .filter_map(|post| post.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let floor = (*last_id).max(stored);
    let now = u64::try_from(now_millis).unwrap_or(0);

    let id = if now > floor {
        now
    } else {
        floor
            .checked_add(1)
            .ok_or_else(|| Error::Internal(format!("no post id left above {}", floor)))?
    };
    *last_id = id;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn service() -> PostService {
        PostService::new(Arc::new(MemoryStore::new()), "defaultuser@example.com")
    }

    async fn seed(service: &PostService, count: usize) -> Vec<Post> {
        let mut created = Vec::new();
        for i in 0..count {
            let post = service
                .create(NewPost::new(format!("Post {}", i), format!("Body {}", i)))
                .await
                .unwrap();
            created.push(post);
        }
        created
    }

    #[test]
    fn test_next_id_uses_clock() {
        let mut last = 0;
        assert_eq!(next_id(&mut last, &[], 1_700_000_000_000).unwrap(), 1_700_000_000_000);
        assert_eq!(last, 1_700_000_000_000);
    }

    #[test]
    fn test_next_id_same_millisecond() {
        let mut last = 0;
        let first = next_id(&mut last, &[], 1_000).unwrap();
        let second = next_id(&mut last, &[], 1_000).unwrap();
        let third = next_id(&mut last, &[], 999).unwrap();

        assert_eq!((first, second, third), (1_000, 1_001, 1_002));
    }

    #[tokio::test]
    async fn test_create_refuses_when_ids_are_exhausted() {
        let at = Utc::now();
        let existing = Post {
            id: u64::MAX.to_string(),
            title: "last".to_string(),
            content: "one".to_string(),
            author: Author::with_default_email("a@example.com"),
            created_at: at,
            updated_at: at,
        };
        let store = Arc::new(MemoryStore::with_posts(vec![existing.clone()]));
        let service = PostService::new(store, "a@example.com");

        let result = service.create(NewPost::new("x", "y")).await;

        assert!(matches!(result, Err(Error::Internal(_))));
        let page = service.list(PageRequest::new(1, 6)).await.unwrap();
        assert_eq!(page.blogs, vec![existing]);
    }

    #[tokio::test]
    async fn test_create_fills_server_fields() {
        let service = service();

        let post = service.create(NewPost::new("A", "B")).await.unwrap();

        assert!(post.id.parse::<u64>().is_ok());
        assert_eq!(post.title, "A");
        assert_eq!(post.content, "B");
        assert_eq!(post.author, Author::with_default_email("defaultuser@example.com"));
        assert_eq!(post.created_at, post.updated_at);
    }

    #[tokio::test]
    async fn test_create_with_author_id() {
        let service = service();

        let post = service
            .create(NewPost::new("A", "B").with_author_id("17"))
            .await
            .unwrap();

        assert_eq!(post.author.id.as_deref(), Some("17"));
        assert_eq!(post.author.email, "user17@example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let service = service();
        seed(&service, 2).await;

        for payload in [
            NewPost::default(),
            NewPost::new("", "body"),
            NewPost::new("title", "   "),
            NewPost {
                title: Some("title".to_string()),
                ..Default::default()
            },
        ] {
            let result = service.create(payload).await;
            assert!(matches!(result, Err(Error::Validation(_))));
        }

        assert_eq!(service.list(PageRequest::new(1, 6)).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let service = service();
        let created = seed(&service, 7).await;

        let first = service.list(PageRequest::new(1, 6)).await.unwrap();
        assert_eq!(first.total, 7);
        assert_eq!(first.blogs, created[..6]);

        let second = service.list(PageRequest::new(2, 6)).await.unwrap();
        assert_eq!(second.total, 7);
        assert_eq!(second.blogs, created[6..]);

        let empty = service.list(PageRequest::new(1, 0)).await.unwrap();
        assert!(empty.blogs.is_empty());
        assert_eq!(empty.total, 7);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let service = Arc::new(service());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create(NewPost::new(format!("t{}", i), "c"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let page = service.list(PageRequest::new(1, 100)).await.unwrap();
        assert_eq!(page.total, 32);

        let ids: HashSet<_> = page.blogs.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 32);

        let numeric: Vec<u64> = page.blogs.iter().map(|p| p.id.parse().unwrap()).collect();
        assert!(numeric.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_get() {
        let service = service();
        let created = seed(&service, 3).await;

        assert_eq!(service.get(&created[1].id).await.unwrap(), created[1]);
        assert!(matches!(service.get("nope").await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_update() {
        let service = service();
        let created = seed(&service, 2).await;

        let updated = service
            .update(
                &created[0].id,
                PostUpdate {
                    title: Some("Renamed".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, created[0].content);
        assert_eq!(updated.created_at, created[0].created_at);
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(service.get(&created[0].id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_validation_and_missing() {
        let service = service();
        let created = seed(&service, 1).await;

        let empty = service.update(&created[0].id, PostUpdate::default()).await;
        assert!(matches!(empty, Err(Error::Validation(_))));

        let blank = service
            .update(
                &created[0].id,
                PostUpdate {
                    title: None,
                    content: Some(" ".to_string()),
                },
            )
            .await;
        assert!(matches!(blank, Err(Error::Validation(_))));

        let missing = service
            .update(
                "nope",
                PostUpdate {
                    title: Some("x".to_string()),
                    content: None,
                },
            )
            .await;
        assert!(matches!(missing, Err(Error::NotFound)));

        assert_eq!(service.get(&created[0].id).await.unwrap(), created[0]);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let created = seed(&service, 3).await;

        service.delete(&created[1].id).await.unwrap();

        let page = service.list(PageRequest::new(1, 6)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.blogs, vec![created[0].clone(), created[2].clone()]);

        assert!(matches!(service.delete(&created[1].id).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_ids_stay_unique_after_reload() {
        let store = Arc::new(MemoryStore::new());
        let first = PostService::new(store.clone(), "a@example.com");
        let existing = seed(&first, 3).await;

        let second = PostService::new(store, "a@example.com");
        let post = second.create(NewPost::new("x", "y")).await.unwrap();

        assert!(existing.iter().all(|p| p.id != post.id));
    }
}
