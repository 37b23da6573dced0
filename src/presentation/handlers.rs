use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::domain::models::{CreatePostInput, Post, UpdatePostInput};
use crate::domain::repository::{PostRepository, UserRepository};
use crate::presentation::error::ApiError;
use crate::presentation::extract::{AuthenticatedUser, Validated};
use actix_web::{HttpResponse, web};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Shared by every worker; repositories hold the store handle.
pub struct AppState {
    pub blog_service: BlogService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        post_repository: Arc<dyn PostRepository>,
        jwt_secret: String,
        token_ttl: Duration,
    ) -> Self {
        Self {
            blog_service: BlogService::new(post_repository),
            auth_service: AuthService::new(user_repository, jwt_secret, token_ttl),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogIdResponse {
    pub blog_id: i32,
}

#[derive(Serialize)]
pub struct BlogsResponse {
    pub blogs: Vec<Post>,
}

#[derive(Serialize)]
pub struct BlogResponse {
    pub blog: Option<Post>,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state, req), fields(user_id = user.user_id, post_id))]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: Validated<CreatePostInput>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating post");
    let post = state
        .blog_service
        .create_post(user.user_id, req.into_inner())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create post");
            ApiError::from(e)
        })?;
    tracing::Span::current().record("post_id", post.id);

    Ok(HttpResponse::Ok().json(BlogIdResponse { blog_id: post.id }))
}

#[instrument(skip(state, req), fields(user_id = user.user_id))]
pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: Validated<UpdatePostInput>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let post_id = req.id;
    info!(post_id, "Updating post");
    let post = state.blog_service.update_post(req).await.map_err(|e| {
        warn!(post_id, error = %e, "Failed to update post");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(BlogIdResponse { blog_id: post.id }))
}

#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn list_posts(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let blogs = state.blog_service.list_posts().await.map_err(|e| {
        warn!(error = %e, "Failed to list posts");
        ApiError::from(e)
    })?;
    info!(count = blogs.len(), "Posts listed");

    Ok(HttpResponse::Ok().json(BlogsResponse { blogs }))
}

/// A missing post is a successful `{"blog": null}`.
#[instrument(skip(state), fields(user_id = user.user_id, post_id = %*path))]
pub async fn get_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    let blog = state.blog_service.get_post(post_id).await.map_err(|e| {
        warn!(post_id, error = %e, "Failed to get post");
        ApiError::from(e)
    })?;
    info!(found = blog.is_some(), "Post lookup finished");

    Ok(HttpResponse::Ok().json(BlogResponse { blog }))
}
