//! Runs against a live PostgreSQL named by `DATABASE_URL`:
//! `DATABASE_URL=postgres://... cargo test --test postgres_tests -- --ignored`

use blog_api::data::postgres::{PgPostRepository, PgUserRepository};
use blog_api::domain::error::DomainError;
use blog_api::domain::models::{NewPost, PostChanges};
use blog_api::domain::repository::{PostRepository, UserRepository};
use blog_api::domain::user::NewUser;
use blog_api::infrastructure::config::DatabaseConfig;
use blog_api::infrastructure::database;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    database::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        acquire_timeout: Duration::from_secs(5),
    })
    .await
    .expect("Failed to connect and migrate")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: None,
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_duplicate_email_is_conflict() {
    let users = PgUserRepository::new(pool().await);
    let email = format!("{}@example.com", Uuid::new_v4());

    let first = users.create_user(new_user(&email)).await.unwrap();
    let err = users.create_user(new_user(&email)).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::Conflict(msg)) if msg == "User with this email already exists"
    ));
    let stored = users.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_post_update_keeps_unset_fields() {
    let pool = pool().await;
    let users = PgUserRepository::new(pool.clone());
    let posts = PgPostRepository::new(pool);
    let author = users
        .create_user(new_user(&format!("{}@example.com", Uuid::new_v4())))
        .await
        .unwrap();

    let post = posts
        .create_post(NewPost {
            title: "T".to_string(),
            content: "C".to_string(),
            author_id: author.id,
        })
        .await
        .unwrap();
    let updated = posts
        .update_post(
            post.id,
            PostChanges {
                title: Some("T2".to_string()),
                content: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "T2");
    assert_eq!(updated.content, "C");
    assert!(posts.update_post(i32::MAX, PostChanges::default()).await.unwrap().is_none());
}
