use crate::domain::error::DomainError;
use crate::domain::models::{NewPost, Post, PostChanges};
use crate::domain::repository::{PostRepository, UserRepository};
use crate::domain::user::{NewUser, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, name, password_hash",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => {
                debug!(user_id = user.id, "User inserted");
                Ok(user)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                warn!("Email already registered");
                Err(DomainError::Conflict("User with this email already exists".to_string()).into())
            }
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up user by email")
    }
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self, post), fields(author_id = post.author_id))]
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3) \
             RETURNING id, title, content, author_id",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert post")?;
        debug!(post_id = post.id, "Post inserted");
        Ok(post)
    }

    #[instrument(skip(self, changes))]
    async fn update_post(&self, id: i32, changes: PostChanges) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET title = COALESCE($2, title), content = COALESCE($3, content) \
             WHERE id = $1 RETURNING id, title, content, author_id",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update post")
    }

    #[instrument(skip(self))]
    async fn find_post_by_id(&self, id: i32) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT id, title, content, author_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up post")
    }

    #[instrument(skip(self))]
    async fn list_posts(&self) -> Result<Vec<Post>> {
        sqlx::query_as::<_, Post>("SELECT id, title, content, author_id FROM posts ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list posts")
    }
}
