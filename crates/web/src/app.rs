use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
};
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::features;
use crate::middleware::error_detail::{ErrorDetailPolicy, expose_error_detail};

/// Full API router with the database injected as state.
pub fn build_app(db: Database, config: &Config) -> Result<Router> {
    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS_ORIGIN: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let error_detail = ErrorDetailPolicy {
        expose: config.is_development(),
    };

    Ok(features::routes()
        .layer(middleware::from_fn_with_state(error_detail, expose_error_detail))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
