use storage::error::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Calculation not found")]
    NotFound,

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Calculation error: {0}")]
    CalculationError(#[from] StorageError),
}
