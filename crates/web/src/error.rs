use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

const INVALID_BODY_MESSAGE: &str =
    "billAmount, tipPercent, and numberOfPeople are required and must be valid numbers";

/// Text of an internal failure, attached to the 500 response's extensions.
/// Only sent to the client when the error detail middleware allows it.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    InvalidBody(JsonRejection),
    InvalidId(PathRejection),
    RouteNotFound,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::InvalidBody(e) => write!(f, "Invalid body: {}", e),
            Self::InvalidId(e) => write!(f, "Invalid id: {}", e),
            Self::RouteNotFound => write!(f, "Route not found"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
        };

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Calculation not found"
                })
            }
            Self::Storage(StorageError::InvalidInput(msg)) => invalid_input(msg),
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                let mut response = (status_code, Json(internal_error_body(None))).into_response();
                response
                    .extensions_mut()
                    .insert(InternalErrorDetail(e.to_string()));
                return response;
            }
            Self::Validation(errors) => {
                let mut field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{}: {}", field, e.code))
                        })
                    })
                    .collect();
                field_errors.sort();

                json!({
                    "error": "Invalid input",
                    "message": field_errors.join("; "),
                    "details": field_errors
                })
            }
            Self::InvalidBody(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                invalid_input(INVALID_BODY_MESSAGE)
            }
            Self::InvalidId(_) => {
                json!({
                    "error": "Invalid calculation ID"
                })
            }
            Self::RouteNotFound => {
                json!({
                    "error": "Route not found"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

fn invalid_input(message: &str) -> Value {
    json!({
        "error": "Invalid input",
        "message": message
    })
}

pub(crate) fn internal_error_body(detail: Option<&str>) -> Value {
    if let Some(detail) = detail {
        json!({
            "error": "An internal error occurred",
            "message": detail
        })
    } else {
        json!({
            "error": "An internal error occurred"
        })
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidId(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: WebError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_of(WebError::from(StorageError::NotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Calculation not found");
    }

    #[tokio::test]
    async fn test_invalid_input_maps_to_400_with_message() {
        let error = StorageError::invalid_input("billAmount must be greater than 0");
        let (status, body) = body_of(WebError::from(error)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input");
        assert_eq!(body["message"], "billAmount must be greater than 0");
    }

    #[tokio::test]
    async fn test_storage_failure_hides_detail() {
        let error = StorageError::Database(sqlx::Error::PoolTimedOut);
        let (status, body) = body_of(WebError::from(error)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_storage_failure_attaches_detail_extension() {
        let error = StorageError::Database(sqlx::Error::PoolClosed);
        let response = WebError::from(error).into_response();

        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert!(detail.0.contains("pool"));
    }

    #[test]
    fn test_client_errors_carry_no_detail_extension() {
        let response = WebError::from(StorageError::NotFound).into_response();
        assert!(response.extensions().get::<InternalErrorDetail>().is_none());
    }
}
