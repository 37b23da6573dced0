use crate::domain::error::DomainError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Body of every failed response.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Errors at the HTTP edge. Each kind owns exactly one status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Inputs not correct")]
    Validation(String),
    #[error("Unauthenticated")]
    Unauthenticated,
    /// The carried text doubles as the `error` field, e.g. `User not found`.
    #[error("{0}")]
    NotFound(String),
    #[error("Conflict")]
    Conflict(String),
    /// Body larger than the configured limit; carries the limit in bytes.
    #[error("Payload too large")]
    PayloadTooLarge(usize),
    /// Store or other server-side failure. The detail is logged, never returned.
    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                msg.as_str()
            }
            ApiError::Unauthenticated => "You are not logged in",
            ApiError::PayloadTooLarge(_) => "Request body exceeds the size limit",
            ApiError::Internal(_) => "Internal error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error")
            }
            ApiError::PayloadTooLarge(limit) => {
                warn!(limit_bytes = limit, status = %status, "Request body too large")
            }
            other => {
                warn!(error = %other, message = %other.message(), status = %status, "Request rejected")
            }
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            message: self.message().to_string(),
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Unauthenticated => ApiError::Unauthenticated,
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            // Anything that is not a domain error came from the store
            Err(other) => ApiError::Internal(format!("{:#}", other)),
        }
    }
}
