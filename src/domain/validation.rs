//! Structural checks applied to request bodies before any handler logic.
//!
//! Decoding into the typed input enforces required fields and JSON types;
//! [`Schema::check`] adds the few checks serde cannot express.

use crate::domain::error::DomainError;
use crate::domain::models::{CreatePostInput, UpdatePostInput};
use crate::domain::user::{SignInInput, SignUpInput};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub trait Schema: DeserializeOwned {
    const NAME: &'static str;

    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Schema for CreatePostInput {
    const NAME: &'static str = "create-post";
}

impl Schema for UpdatePostInput {
    const NAME: &'static str = "update-post";
}

impl Schema for SignUpInput {
    const NAME: &'static str = "sign-up";

    fn check(&self) -> Result<(), String> {
        if is_email_shaped(&self.email) {
            Ok(())
        } else {
            Err("email: invalid email".to_string())
        }
    }
}

impl Schema for SignInInput {
    const NAME: &'static str = "sign-in";
}

/// Decodes `body` as `S` and runs its checks. On failure no typed value is produced.
pub fn safe_parse<S: Schema>(body: Value) -> Result<S, DomainError> {
    let input: S = serde_json::from_value(body).map_err(|e| {
        debug!(schema = S::NAME, error = %e, "Body does not match schema");
        DomainError::Validation(e.to_string())
    })?;

    input.check().map_err(|msg| {
        debug!(schema = S::NAME, error = %msg, "Body failed schema check");
        DomainError::Validation(msg)
    })?;

    Ok(input)
}

pub fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
