use axum::{Router, routing::post};
use storage::Database;

use super::handlers::{calculate, validate_calculation};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(calculate))
        .route("/validate", post(validate_calculation))
}
