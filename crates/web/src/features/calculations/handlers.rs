use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::calculation::{CalculationRequest, CalculationResponse},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/calculations",
    request_body = CalculationRequest,
    responses(
        (status = 201, description = "Split calculated and saved to history", body = CalculationResponse),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Calculation could not be saved")
    ),
    tag = "calculations"
)]
pub async fn calculate(
    State(db): State<Database>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Response, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let calculation = services::calculate_and_save(db.pool(), &req).await?;
    tracing::info!(
        id = calculation.id,
        people = calculation.number_of_people,
        "Calculation saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(CalculationResponse::from(calculation)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/calculations/validate",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Split calculated, nothing saved", body = CalculationResponse),
        (status = 400, description = "Invalid input")
    ),
    tag = "calculations"
)]
pub async fn validate_calculation(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResponse>, WebError> {
    let Json(req) = payload?;
    req.validate()?;

    let split = services::calculate(&req)?;

    Ok(Json(CalculationResponse::from(split)))
}
