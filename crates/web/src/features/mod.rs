use axum::{Router, routing::get};
use storage::Database;

use crate::error::WebError;

pub mod calculations;
pub mod health;
pub mod history;

pub fn routes() -> Router<Database> {
    Router::new()
        .nest("/api/calculations", calculations::routes::routes())
        .nest("/api/history", history::routes::routes())
        .route("/health", get(health::handlers::health))
        .fallback(route_not_found)
}

async fn route_not_found() -> WebError {
    WebError::RouteNotFound
}
