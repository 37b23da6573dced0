use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, SignInInput, SignUpInput};
use crate::infrastructure::security::{generate_token, hash_password, verify_password_or_dummy};
use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tracing::{error, info, instrument, trace, warn};

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        jwt_secret: String,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl,
        }
    }

    /// Creates the user and returns a session token for it.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn sign_up(&self, req: SignUpInput) -> Result<String> {
        trace!("Starting sign-up");

        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DomainError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {}", e))
            })?;

        let user = self
            .user_repository
            .create_user(NewUser {
                email: req.email,
                name: req.name,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User signed up");
        self.issue_token(user.id)
    }

    /// Unknown email and wrong password both yield `User not found`.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn sign_in(&self, req: SignInInput) -> Result<String> {
        trace!("Starting sign-in");

        let not_found = || DomainError::NotFound("User not found".to_string());

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?;

        // An unknown email still pays for one hash verification
        let password = req.password;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let is_valid = tokio::task::spawn_blocking(move || {
            verify_password_or_dummy(&password, stored_hash.as_deref())
        })
        .await
        .map_err(|e| DomainError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        let user = match user {
            Some(user) if is_valid => user,
            Some(user) => {
                warn!(user_id = user.id, "Wrong password");
                return Err(not_found().into());
            }
            None => {
                warn!("No user with this email");
                return Err(not_found().into());
            }
        };

        info!(user_id = user.id, "User signed in");
        self.issue_token(user.id)
    }

    fn issue_token(&self, user_id: i32) -> Result<String> {
        generate_token(user_id, &self.jwt_secret, self.token_ttl).map_err(|e| {
            error!(user_id, error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e)).into()
        })
    }
}
