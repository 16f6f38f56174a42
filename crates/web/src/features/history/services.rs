use sqlx::SqlitePool;
use storage::{
    dto::common::PageRequest, error::Result, models::Calculation,
    repository::calculation::CalculationRepository,
};

/// One page of history plus the total record count
pub async fn list_history(
    pool: &SqlitePool,
    page: &PageRequest,
) -> Result<(Vec<Calculation>, i64)> {
    let repo = CalculationRepository::new(pool);
    repo.list(page).await
}

pub async fn get_calculation(pool: &SqlitePool, id: i64) -> Result<Calculation> {
    let repo = CalculationRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn delete_calculation(pool: &SqlitePool, id: i64) -> Result<()> {
    let repo = CalculationRepository::new(pool);
    repo.delete(id).await
}

/// Clear the whole history; returns the number of records removed
pub async fn delete_all_calculations(pool: &SqlitePool) -> Result<u64> {
    let repo = CalculationRepository::new(pool);
    repo.delete_all().await
}
