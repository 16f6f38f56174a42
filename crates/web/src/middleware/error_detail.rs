use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{InternalErrorDetail, internal_error_body};

/// Whether 500 responses carry the underlying error text
#[derive(Debug, Clone, Copy)]
pub struct ErrorDetailPolicy {
    pub expose: bool,
}

/// Rewrites internal error responses to include their detail when the
/// policy allows it.
pub async fn expose_error_detail(
    State(policy): State<ErrorDetailPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !policy.expose {
        return response;
    }

    let detail = response
        .extensions()
        .get::<InternalErrorDetail>()
        .map(|detail| detail.0.clone());

    match detail {
        Some(detail) => {
            (response.status(), Json(internal_error_body(Some(&detail)))).into_response()
        }
        None => response,
    }
}
