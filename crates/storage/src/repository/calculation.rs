use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};

use crate::dto::common::PageRequest;
use crate::error::{Result, StorageError};
use crate::models::{Calculation, NewCalculation};

#[derive(FromRow)]
struct CalculationRow {
    id: i64,
    bill_amount: String,
    tip_percent: String,
    number_of_people: i64,
    tip_amount: String,
    total_with_tip: String,
    amount_per_person: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CalculationRow> for Calculation {
    type Error = StorageError;

    fn try_from(row: CalculationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            bill_amount: parse_decimal(row.id, "bill_amount", &row.bill_amount)?,
            tip_percent: parse_decimal(row.id, "tip_percent", &row.tip_percent)?,
            number_of_people: row.number_of_people,
            tip_amount: parse_decimal(row.id, "tip_amount", &row.tip_amount)?,
            total_with_tip: parse_decimal(row.id, "total_with_tip", &row.total_with_tip)?,
            amount_per_person: parse_decimal(row.id, "amount_per_person", &row.amount_per_person)?,
            created_at: row.created_at,
        })
    }
}

fn parse_decimal(id: i64, column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        StorageError::Corrupt(format!("calculation {id}: {column} = {raw:?}: {e}"))
    })
}

pub struct CalculationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CalculationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a calculation and return it with its id and timestamp
    pub async fn save(&self, new: &NewCalculation) -> Result<Calculation> {
        let created_at = Utc::now().trunc_subsecs(6);
        let split = new.split();

        let row = sqlx::query_as::<_, CalculationRow>(
            r#"
            INSERT INTO calculations (
                bill_amount, tip_percent, number_of_people,
                tip_amount, total_with_tip, amount_per_person, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, bill_amount, tip_percent, number_of_people,
                      tip_amount, total_with_tip, amount_per_person, created_at
            "#,
        )
        .bind(new.bill_amount().to_string())
        .bind(new.tip_percent().to_string())
        .bind(new.number_of_people())
        .bind(split.tip_amount.to_string())
        .bind(split.total_with_tip.to_string())
        .bind(split.amount_per_person.to_string())
        .bind(created_at)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = row.id, "Saved calculation");

        Calculation::try_from(row)
    }

    /// Newest first, ties broken by id so pages stay stable between calls.
    /// The page and the total are read in one transaction.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<Calculation>, i64)> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM calculations")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, CalculationRow>(
            r#"
            SELECT id, bill_amount, tip_percent, number_of_people,
                   tip_amount, total_with_tip, amount_per_person, created_at
            FROM calculations
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let calculations = rows
            .into_iter()
            .map(Calculation::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((calculations, total))
    }

    /// Find calculation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Calculation> {
        let row = sqlx::query_as::<_, CalculationRow>(
            r#"
            SELECT id, bill_amount, tip_percent, number_of_people,
                   tip_amount, total_with_tip, amount_per_person, created_at
            FROM calculations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Calculation::try_from(row)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM calculations WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Remove every calculation, returning how many were removed
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM calculations")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    fn new_calculation(bill: &str, tip: &str, people: &str) -> NewCalculation {
        NewCalculation::compute(
            bill.parse().unwrap(),
            tip.parse().unwrap(),
            people.parse().unwrap(),
        )
        .unwrap()
    }

    async fn seed(repo: &CalculationRepository<'_>, count: usize) -> Vec<Calculation> {
        let mut saved = Vec::with_capacity(count);
        for i in 0..count {
            let bill = format!("{}.50", 10 + i);
            saved.push(repo.save(&new_calculation(&bill, "15", "2")).await.unwrap());
        }
        saved
    }

    #[tokio::test]
    async fn test_save_then_find_round_trip() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());

        let saved = repo.save(&new_calculation("33.33", "15", "3")).await.unwrap();
        let found = repo.find_by_id(saved.id).await.unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.tip_amount.to_string(), "5.00");
        assert_eq!(found.total_with_tip.to_string(), "38.33");
        assert_eq!(found.amount_per_person.to_string(), "12.78");
        assert_eq!(found.number_of_people, 3);
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());

        let saved = seed(&repo, 3).await;
        assert!(saved[0].id < saved[1].id && saved[1].id < saved[2].id);
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());

        let err = repo.find_by_id(42).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());
        let saved = seed(&repo, 7).await;
        let newest_first: Vec<i64> = saved.iter().rev().map(|c| c.id).collect();

        let n = saved.len() as i64;
        for (limit, offset) in [(3, 0), (3, 3), (3, 6), (5, 5), (10, 0), (2, 7), (4, 20)] {
            let page = PageRequest::new(limit, offset).unwrap();
            let (records, total) = repo.list(&page).await.unwrap();

            let expected = limit.min((n - offset).max(0)) as usize;
            assert_eq!(total, n);
            assert_eq!(records.len(), expected, "limit={limit} offset={offset}");

            let ids: Vec<i64> = records.iter().map(|c| c.id).collect();
            let start = (offset as usize).min(newest_first.len());
            assert_eq!(ids, newest_first[start..start + expected]);
        }
    }

    #[tokio::test]
    async fn test_list_is_stable_across_calls() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());
        seed(&repo, 5).await;

        let page = PageRequest::new(2, 1).unwrap();
        let (first, _) = repo.list(&page).await.unwrap();
        let (second, _) = repo.list(&page).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());
        let saved = seed(&repo, 3).await;

        repo.delete(saved[1].id).await.unwrap();

        let (records, total) = repo.list(&PageRequest::default()).await.unwrap();
        assert_eq!(total, 2);
        let ids: Vec<i64> = records.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![saved[2].id, saved[0].id]);

        let err = repo.find_by_id(saved[1].id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_changes_nothing() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());
        seed(&repo, 2).await;

        let err = repo.delete(9_999).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        let (_, total) = repo.list(&PageRequest::default()).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_delete_all_is_idempotent() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());
        seed(&repo, 4).await;

        assert_eq!(repo.delete_all().await.unwrap(), 4);
        assert_eq!(repo.delete_all().await.unwrap(), 0);

        let (records, total) = repo.list(&PageRequest::default()).await.unwrap();
        assert!(records.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let db = test_db().await;
        let repo = CalculationRepository::new(db.pool());
        let saved = seed(&repo, 2).await;

        repo.delete_all().await.unwrap();
        let next = repo.save(&new_calculation("10", "10", "1")).await.unwrap();
        assert!(next.id > saved[1].id);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let db = test_db().await;
        sqlx::query(
            r#"
            INSERT INTO calculations (
                bill_amount, tip_percent, number_of_people,
                tip_amount, total_with_tip, amount_per_person, created_at
            )
            VALUES ('abc', '10', 1, '1.00', '11.00', '11.00', '2025-01-01T00:00:00+00:00')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let repo = CalculationRepository::new(db.pool());
        let err = repo.find_by_id(1).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
