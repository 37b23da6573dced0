//! Request extractors that run before handler code: the authenticated
//! identity and schema-checked bodies.

use crate::domain::validation::{Schema, safe_parse};
use crate::presentation::error::ApiError;
use actix_web::dev::Payload;
use actix_web::error::PayloadError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use serde_json::Value;
use std::future::{Future, Ready, ready};
use std::pin::Pin;

/// Identity placed in request extensions by `JwtAuthMiddleware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .copied()
                .ok_or(ApiError::Unauthenticated),
        )
    }
}

// actix's own limit when no `PayloadConfig` is registered
const DEFAULT_BODY_LIMIT: usize = 262_144;

/// Body size limit reported in 413 responses. Registered alongside the
/// matching `web::PayloadConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimit(pub usize);

/// A request body decoded and checked against schema `S`.
#[derive(Debug)]
pub struct Validated<S>(pub S);

impl<S> Validated<S> {
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S: Schema + 'static> FromRequest for Validated<S> {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let limit = req
            .app_data::<BodyLimit>()
            .map_or(DEFAULT_BODY_LIMIT, |limit| limit.0);
        let bytes = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = bytes.await.map_err(|e| match e.as_error::<PayloadError>() {
                Some(PayloadError::Overflow) => ApiError::PayloadTooLarge(limit),
                _ => ApiError::Validation(e.to_string()),
            })?;
            let body: Value = serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Validation(format!("Body is not valid JSON: {}", e)))?;
            let input = safe_parse::<S>(body)?;
            Ok(Validated(input))
        })
    }
}
