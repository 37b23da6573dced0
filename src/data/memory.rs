use crate::domain::models::{NewPost, Post, PostChanges};
use crate::domain::repository::PostRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Default)]
struct PostTable {
    last_id: i32,
    rows: BTreeMap<i32, Post>,
}

/// Post store used when no database is configured. Ids start at 1 and
/// increase like a serial column.
#[derive(Clone, Default)]
pub struct InMemoryPostRepository {
    storage: Arc<RwLock<PostTable>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    #[instrument(skip(self, post), fields(author_id = post.author_id))]
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut table = self.storage.write().await;
        table.last_id += 1;
        let post = Post {
            id: table.last_id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
        };
        table.rows.insert(post.id, post.clone());
        debug!(post_id = post.id, "Post saved to memory storage");
        Ok(post)
    }

    #[instrument(skip(self, changes))]
    async fn update_post(&self, id: i32, changes: PostChanges) -> Result<Option<Post>> {
        let mut table = self.storage.write().await;
        let Some(post) = table.rows.get_mut(&id) else {
            trace!("Post not found in storage");
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        debug!("Post updated in memory storage");
        Ok(Some(post.clone()))
    }

    #[instrument(skip(self))]
    async fn find_post_by_id(&self, id: i32) -> Result<Option<Post>> {
        let table = self.storage.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let table = self.storage.read().await;
        trace!(count = table.rows.len(), "Listing posts from storage");
        Ok(table.rows.values().cloned().collect())
    }
}
