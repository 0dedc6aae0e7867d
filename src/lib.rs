pub mod config;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use config::{Config, ConfigError};
use service::NoteService;

/// Full HTTP application: REST routes wrapped in CORS and request tracing.
pub fn app(service: Arc<NoteService>, cfg: &Config) -> Result<Router, ConfigError> {
    // AllowOrigin::list panics on a wildcard entry
    let origins = if cfg.cors_allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(cfg.allowed_origins()?)
    };

    // No credentials: the API has no auth, and credentials forbid wildcard methods/headers
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(handlers::rest::router(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
