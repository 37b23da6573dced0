use crate::domain::models::{NewPost, Post, PostChanges};
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<Post>;
    /// Returns `None` when no post has the given id.
    async fn update_post(&self, id: i32, changes: PostChanges) -> Result<Option<Post>>;
    async fn find_post_by_id(&self, id: i32) -> Result<Option<Post>>;
    async fn list_posts(&self) -> Result<Vec<Post>>;
}

/// Implementations must reject a second user with the same email
/// with `DomainError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}
