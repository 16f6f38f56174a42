pub mod client;
pub mod error;

pub use client::{FallbackOutcome, TipSplitClient};
pub use error::{ClientError, Result};
pub use storage::dto::calculation::{CalculationRequest, CalculationResponse};
pub use storage::dto::history::HistoryResponse;
pub use storage::models::Calculation;
