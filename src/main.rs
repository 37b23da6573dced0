use actix_web::{App, HttpServer, web};
use anyhow::Context;
use blog_api::data::memory::InMemoryPostRepository;
use blog_api::data::postgres::{PgPostRepository, PgUserRepository};
use blog_api::data::user_repository::InMemoryUserRepository;
use blog_api::domain::repository::{PostRepository, UserRepository};
use blog_api::infrastructure::config::AppConfig;
use blog_api::infrastructure::database;
use blog_api::infrastructure::logging::init_logging;
use blog_api::presentation::handlers::AppState;
use blog_api::presentation::middleware::RequestTracingMiddleware;
use blog_api::presentation::routes::{self, ROUTES};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!(bind_address = %config.bind_address, "Configuration loaded");

    let (user_repository, post_repository): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) =
        match &config.database {
            Some(db) => {
                let pool = database::connect(db).await?;
                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgPostRepository::new(pool)),
                )
            }
            None => {
                warn!("DATABASE_URL not set, data lives in memory and is lost on exit");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryPostRepository::new()),
                )
            }
        };

    let state = web::Data::new(AppState::new(
        user_repository,
        post_repository,
        config.jwt_secret.clone(),
        config.token_ttl,
    ));

    let settings = routes::ApiSettings::from_config(&config);
    let cors_origins = config.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors(&cors_origins))
            .wrap(RequestTracingMiddleware)
            .configure(routes::configure(settings.clone()))
    })
    .bind(&config.bind_address)
    .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    info!(address = %config.bind_address, routes = ROUTES, "Starting HTTP server");
    server.run().await?;
    Ok(())
}
