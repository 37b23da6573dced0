pub mod auth_service;
pub mod blog_service;
