use sqlx::SqlitePool;
use storage::{
    dto::calculation::CalculationRequest,
    error::Result,
    models::Calculation,
    repository::calculation::CalculationRepository,
    services::split::{self, SplitResult},
};

/// Compute the split and persist it
pub async fn calculate_and_save(
    pool: &SqlitePool,
    request: &CalculationRequest,
) -> Result<Calculation> {
    let new = request.compute()?;

    let repo = CalculationRepository::new(pool);
    repo.save(&new).await
}

/// Compute the split without touching the store
pub fn calculate(request: &CalculationRequest) -> Result<SplitResult> {
    split::compute_split(
        request.bill_amount,
        request.tip_percent,
        request.number_of_people,
    )
}
