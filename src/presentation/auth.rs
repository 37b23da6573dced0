use crate::domain::user::{SignInInput, SignUpInput};
use crate::presentation::error::ApiError;
use crate::presentation::extract::Validated;
use crate::presentation::handlers::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Serialize)]
pub struct JwtResponse {
    pub jwt: String,
}

#[instrument(skip_all)]
pub async fn signup(
    state: web::Data<AppState>,
    req: Validated<SignUpInput>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    info!(email = %req.email, "Sign-up request received");

    let jwt = state.auth_service.sign_up(req).await.map_err(|e| {
        warn!(error = %e, "Failed to sign up");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(JwtResponse { jwt }))
}

#[instrument(skip_all)]
pub async fn signin(
    state: web::Data<AppState>,
    req: Validated<SignInInput>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    info!(email = %req.email, "Sign-in request received");

    let jwt = state.auth_service.sign_in(req).await.map_err(|e| {
        warn!(error = %e, "Failed to sign in");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(JwtResponse { jwt }))
}
