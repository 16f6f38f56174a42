use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{delete_all_calculations, delete_calculation, get_calculation, list_history};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_history).delete(delete_all_calculations))
        .route("/:id", get(get_calculation).delete(delete_calculation))
}
