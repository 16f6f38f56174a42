use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use storage::dto::calculation::{CalculationRequest, CalculationResponse};
use storage::dto::history::HistoryResponse;
use storage::models::Calculation;
use storage::services::split::compute_split;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Result of [`TipSplitClient::calculate_with_fallback`]
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    pub response: CalculationResponse,
    pub backend_connected: bool,
}

/// Client for the tip calculator HTTP API
#[derive(Debug, Clone)]
pub struct TipSplitClient {
    client: Client,
    base_url: String,
}

impl TipSplitClient {
    /// Create a client for the API at `base_url` (e.g. "http://localhost:3001")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calculate and save to history
    pub async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        let response = self
            .client
            .post(self.url("/api/calculations"))
            .json(request)
            .send()
            .await?;

        parse_json(response).await
    }

    /// Calculate without saving
    pub async fn validate(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        let response = self
            .client
            .post(self.url("/api/calculations/validate"))
            .json(request)
            .send()
            .await?;

        parse_json(response).await
    }

    pub async fn history(&self, limit: i64, offset: i64) -> Result<HistoryResponse> {
        let response = self
            .client
            .get(self.url("/api/history"))
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;

        parse_json(response).await
    }

    pub async fn get_calculation(&self, id: i64) -> Result<Calculation> {
        let response = self
            .client
            .get(self.url(&format!("/api/history/{id}")))
            .send()
            .await?;

        parse_json(response).await
    }

    pub async fn delete_calculation(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/history/{id}")))
            .send()
            .await?;

        ensure_success(response).await
    }

    pub async fn delete_all(&self) -> Result<()> {
        let response = self.client.delete(self.url("/api/history")).send().await?;

        ensure_success(response).await
    }

    /// True when the backend answers its health check
    pub async fn check_health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Calculate through the backend, recomputing locally if that fails.
    ///
    /// Backend failures are not returned as errors; the outcome is marked as
    /// disconnected instead. Inputs the calculator rejects still error.
    pub async fn calculate_with_fallback(
        &self,
        request: &CalculationRequest,
    ) -> Result<FallbackOutcome> {
        match self.calculate(request).await {
            Ok(response) => Ok(FallbackOutcome {
                response,
                backend_connected: self.check_health().await,
            }),
            Err(e) => {
                tracing::warn!("Backend calculation failed, computing locally: {}", e);

                let split = compute_split(
                    request.bill_amount,
                    request.tip_percent,
                    request.number_of_people,
                )?;

                Ok(FallbackOutcome {
                    response: CalculationResponse::from(split),
                    backend_connected: false,
                })
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}

async fn ensure_success(response: Response) -> Result<()> {
    check_status(response).await.map(|_| ())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::ApiError {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Prefer the server's `message`, then its `error`, then a generic text
fn api_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|json| {
            json.get("message")
                .and_then(|m| m.as_str())
                .or_else(|| json.get("error").and_then(|e| e.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| "Request failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on port 1, so connections are refused immediately.
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn request(bill: &str, tip: &str, people: &str) -> CalculationRequest {
        CalculationRequest::new(
            bill.parse().unwrap(),
            tip.parse().unwrap(),
            people.parse().unwrap(),
        )
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TipSplitClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.url("/health"), "http://localhost:3001/health");
    }

    #[test]
    fn test_api_error_message_prefers_message() {
        assert_eq!(
            api_error_message(
                r#"{"error": "Invalid input", "message": "billAmount must be greater than 0"}"#
            ),
            "billAmount must be greater than 0"
        );
        assert_eq!(
            api_error_message(r#"{"error": "Invalid calculation ID"}"#),
            "Invalid calculation ID"
        );
        assert_eq!(api_error_message("<html>"), "Request failed");
    }

    #[tokio::test]
    async fn test_health_is_false_when_unreachable() {
        let client = TipSplitClient::new(UNREACHABLE).unwrap();
        assert!(!client.check_health().await);
    }

    #[tokio::test]
    async fn test_fallback_computes_locally() {
        let client = TipSplitClient::new(UNREACHABLE).unwrap();

        let outcome = client
            .calculate_with_fallback(&request("33.33", "15", "3"))
            .await
            .unwrap();

        assert!(!outcome.backend_connected);
        assert_eq!(outcome.response.tip_amount.to_string(), "5.00");
        assert_eq!(outcome.response.total_with_tip.to_string(), "38.33");
        assert_eq!(outcome.response.amount_per_person.to_string(), "12.78");
        assert_eq!(outcome.response.calculation_id, None);
    }

    #[tokio::test]
    async fn test_fallback_still_rejects_invalid_input() {
        let client = TipSplitClient::new(UNREACHABLE).unwrap();

        let err = client
            .calculate_with_fallback(&request("100", "10", "0"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::CalculationError(_)));
    }

    #[tokio::test]
    async fn test_plain_calls_surface_connection_errors() {
        let client = TipSplitClient::new(UNREACHABLE).unwrap();

        let err = client.history(10, 0).await.unwrap_err();
        assert!(matches!(err, ClientError::RequestError(_)));
    }
}
