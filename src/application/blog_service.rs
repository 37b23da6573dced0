use crate::domain::error::DomainError;
use crate::domain::models::{CreatePostInput, NewPost, Post, UpdatePostInput};
use crate::domain::repository::PostRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Each method performs exactly one store call. Posts carry no ownership
/// rule: any authenticated user may update any post.
pub struct BlogService {
    repository: Arc<dyn PostRepository>,
}

impl BlogService {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req))]
    pub async fn create_post(&self, author_id: i32, req: CreatePostInput) -> Result<Post> {
        let post = self
            .repository
            .create_post(NewPost {
                title: req.title,
                content: req.content,
                author_id,
            })
            .await?;
        info!(post_id = post.id, "Post created");
        Ok(post)
    }

    #[instrument(skip(self, req), fields(post_id = req.id))]
    pub async fn update_post(&self, req: UpdatePostInput) -> Result<Post> {
        let (id, changes) = req.into_parts();
        let post = self
            .repository
            .update_post(id, changes)
            .await?
            .ok_or_else(|| {
                warn!("Post to update does not exist");
                DomainError::NotFound(format!("Post {} not found", id))
            })?;
        info!("Post updated");
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.repository.list_posts().await
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: i32) -> Result<Option<Post>> {
        self.repository.find_post_by_id(id).await
    }
}
