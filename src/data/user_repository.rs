use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Default)]
struct UserTable {
    last_id: i32,
    rows: HashMap<i32, User>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut table = self.storage.write().await;

        // Mirrors the unique index on users.email
        if table.rows.values().any(|u| u.email == user.email) {
            warn!("Email already registered");
            return Err(
                DomainError::Conflict("User with this email already exists".to_string()).into(),
            );
        }

        table.last_id += 1;
        let user = User {
            id: table.last_id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
        };
        table.rows.insert(user.id, user.clone());
        debug!(user_id = user.id, "User saved to memory storage");
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let table = self.storage.read().await;
        let user = table.rows.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: None,
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_assigns_id() {
        let repo = InMemoryUserRepository::new();

        let user = repo
            .create_user(NewUser {
                email: "alice@example.com".to_string(),
                name: Some("Alice".to_string()),
                password_hash: "hash123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert_eq!(user.password_hash, "hash123");
    }

    #[tokio::test]
    async fn test_find_user_by_email_finds_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create_user(new_user("bob@example.com")).await.unwrap();

        let found = repo.find_user_by_email("bob@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_find_user_by_email_returns_none_for_nonexistent_email() {
        let repo = InMemoryUserRepository::new();
        let found = repo
            .find_user_by_email("nonexistent@example.com")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(new_user("dup@example.com")).await.unwrap();

        let err = repo.create_user(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_find_user_by_email_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(new_user("Test@Example.com")).await.unwrap();

        assert!(repo.find_user_by_email("Test@Example.com").await.unwrap().is_some());
        assert!(repo.find_user_by_email("test@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signups_create_one_user() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo_clone = repo.clone();
                tokio::spawn(async move { repo_clone.create_user(new_user("race@example.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }
}
