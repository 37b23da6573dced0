use crate::infrastructure::config::{AppConfig, DEFAULT_MAX_BODY_BYTES};
use crate::presentation::auth::{signin, signup};
use crate::presentation::error::ApiError;
use crate::presentation::extract::BodyLimit;
use crate::presentation::handlers::{
    create_post, get_post, health_check, list_posts, update_post,
};
use crate::presentation::middleware::JwtAuthMiddleware;
use actix_cors::Cors;
use actix_web::web;

pub const ROUTES: &str = "GET /api/v1/health, POST /api/v1/user/signup, \
    POST /api/v1/user/signin, POST /api/v1/blog, PUT /api/v1/blog, \
    GET /api/v1/blog/bulk, GET /api/v1/blog/{id}";

/// Settings the route table needs from the application config.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub jwt_secret: String,
    pub max_body_bytes: usize,
}

impl ApiSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.jwt_secret.clone()).with_max_body_bytes(config.max_body_bytes)
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Registers the `/api/v1` routes. Everything under `/blog` requires a token
/// signed with `settings.jwt_secret`.
pub fn configure(settings: ApiSettings) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
            ApiError::Validation(err.to_string()).into()
        }))
        .app_data(web::PayloadConfig::new(settings.max_body_bytes))
        .app_data(BodyLimit(settings.max_body_bytes))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(health_check))
                .service(
                    web::scope("/user")
                        .route("/signup", web::post().to(signup))
                        .route("/signin", web::post().to(signin)),
                )
                .service(
                    web::scope("/blog")
                        .wrap(JwtAuthMiddleware::new(settings.jwt_secret))
                        .route("", web::post().to(create_post))
                        .route("", web::put().to(update_post))
                        // before "/{id}" so "bulk" is not parsed as an id
                        .route("/bulk", web::get().to(list_posts))
                        .route("/{id}", web::get().to(get_post)),
                ),
        );
    }
}

/// Empty `allowed_origins` allows any origin.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
