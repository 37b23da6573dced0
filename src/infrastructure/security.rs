use crate::domain::error::DomainError;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

// Argon2 parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 1;

const TOKEN_LEEWAY_SECS: u64 = 60;

/// Identity carried inside a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
    iat: i64,
    exp: i64,
}

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    let params = argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
        .map_err(argon2::password_hash::Error::from)?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Like [`verify_password`], but with no stored hash it still runs one
/// verification against a throwaway hash and returns `false`, so unknown
/// users take as long as wrong passwords.
pub fn verify_password_or_dummy(
    password: &str,
    hash: Option<&str>,
) -> Result<bool, argon2::password_hash::Error> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, dummy_hash()?)?;
            Ok(false)
        }
    }
}

fn dummy_hash() -> Result<&'static str, argon2::password_hash::Error> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("no-such-user")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

pub fn generate_token(
    user_id: i32,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        id: user_id,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies signature and expiry and returns the user id.
///
/// Every failure maps to [`DomainError::Unauthenticated`]; the cause is only logged.
pub fn validate_token(token: &str, secret: &str) -> Result<i32, DomainError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = TOKEN_LEEWAY_SECS;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims.id)
        .map_err(|e| {
            debug!(error = %e, "Token rejected");
            DomainError::Unauthenticated
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn test_hash_password_generates_argon2id_hash() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(!hash.is_empty());
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_password_same_password_produces_different_hashes() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        // Random salt per hash
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct_password_returns_true() {
        let hash = hash_password("correct_password").unwrap();
        assert!(verify_password("correct_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect_password_returns_false() {
        let hash = hash_password("correct_password").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash_format() {
        assert!(verify_password("test_password", "not_a_valid_hash").is_err());
    }

    #[test]
    fn test_verify_password_with_unicode() {
        let password = "пароль123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_verify_password_or_dummy_without_hash_is_false() {
        assert!(!verify_password_or_dummy("any_password", None).unwrap());
        // The dummy hash is built once and reused
        assert!(!verify_password_or_dummy("any_password", None).unwrap());
        assert!(dummy_hash().unwrap().starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_password_or_dummy_with_hash_checks_it() {
        let hash = hash_password("correct_password").unwrap();

        assert!(verify_password_or_dummy("correct_password", Some(&hash)).unwrap());
        assert!(!verify_password_or_dummy("wrong_password", Some(&hash)).unwrap());
    }

    #[test]
    fn test_generate_token_has_three_segments() {
        let token = generate_token(1, "test_secret_key", day()).unwrap();

        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_validate_token_recovers_user_id() {
        let token = generate_token(456, "test_secret", day()).unwrap();
        assert_eq!(validate_token(&token, "test_secret").unwrap(), 456);
    }

    #[test]
    fn test_validate_token_rejects_malformed_token() {
        let result = validate_token("invalid.token.here", "secret_key");
        assert!(matches!(result, Err(DomainError::Unauthenticated)));

        let result = validate_token("", "secret_key");
        assert!(matches!(result, Err(DomainError::Unauthenticated)));
    }

    #[test]
    fn test_validate_token_rejects_token_with_wrong_secret() {
        let token = generate_token(7, "correct_secret", day()).unwrap();
        let result = validate_token(&token, "wrong_secret");

        assert!(matches!(result, Err(DomainError::Unauthenticated)));
    }

    #[test]
    fn test_validate_token_rejects_expired_token() {
        let token = generate_token(7, "secret", Duration::hours(-2)).unwrap();
        let result = validate_token(&token, "secret");

        assert!(matches!(result, Err(DomainError::Unauthenticated)));
    }

    #[test]
    fn test_validate_token_rejects_tampered_payload() {
        let token = generate_token(1, "secret", day()).unwrap();
        let other = generate_token(2, "secret", day()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(validate_token(&forged, "secret").is_err());
    }

    #[test]
    fn test_generate_token_different_users_produce_different_tokens() {
        let token1 = generate_token(1, "test_secret", day()).unwrap();
        let token2 = generate_token(2, "test_secret", day()).unwrap();

        assert_ne!(token1, token2);
    }
}
