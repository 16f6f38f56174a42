use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use storage::{
    Database,
    dto::{
        common::MessageResponse,
        history::{HistoryQuery, HistoryResponse},
    },
    models::Calculation,
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Page of saved calculations, newest first", body = HistoryResponse)
    ),
    tag = "history"
)]
pub async fn list_history(
    State(db): State<Database>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, WebError> {
    let query = query.map(|Query(query)| query).unwrap_or_else(|rejection| {
        tracing::debug!("Unreadable history query, using defaults: {}", rejection.body_text());
        HistoryQuery::default()
    });
    let page = query.page();

    let (calculations, total) = services::list_history(db.pool(), &page).await?;

    Ok(Json(HistoryResponse::new(calculations, page, total)))
}

#[utoipa::path(
    get,
    path = "/api/history/{id}",
    params(
        ("id" = i64, Path, description = "Calculation id")
    ),
    responses(
        (status = 200, description = "Calculation found", body = Calculation),
        (status = 400, description = "Invalid calculation ID"),
        (status = 404, description = "Calculation not found")
    ),
    tag = "history"
)]
pub async fn get_calculation(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Calculation>, WebError> {
    let Path(id) = id?;

    let calculation = services::get_calculation(db.pool(), id).await?;

    Ok(Json(calculation))
}

#[utoipa::path(
    delete,
    path = "/api/history/{id}",
    params(
        ("id" = i64, Path, description = "Calculation id")
    ),
    responses(
        (status = 200, description = "Calculation deleted", body = MessageResponse),
        (status = 400, description = "Invalid calculation ID"),
        (status = 404, description = "Calculation not found")
    ),
    tag = "history"
)]
pub async fn delete_calculation(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, WebError> {
    let Path(id) = id?;

    services::delete_calculation(db.pool(), id).await?;
    tracing::info!(id, "Calculation deleted");

    Ok(Json(MessageResponse::new("Calculation deleted successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/history",
    responses(
        (status = 200, description = "All calculations deleted", body = MessageResponse)
    ),
    tag = "history"
)]
pub async fn delete_all_calculations(
    State(db): State<Database>,
) -> Result<Json<MessageResponse>, WebError> {
    let removed = services::delete_all_calculations(db.pool()).await?;
    tracing::info!(removed, "Calculation history cleared");

    Ok(Json(MessageResponse::new("All calculations deleted successfully")))
}
