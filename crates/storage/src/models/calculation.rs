use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;
use crate::services::split::{self, SplitResult};

/// A persisted calculation. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100.0)]
    pub bill_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15.0)]
    pub tip_percent: Decimal,
    pub number_of_people: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15.0)]
    pub tip_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 115.0)]
    pub total_with_tip: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 57.5)]
    pub amount_per_person: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Inputs plus derived amounts, ready to be inserted.
///
/// Only constructible through [`NewCalculation::compute`], so the derived
/// fields always come from the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalculation {
    bill_amount: Decimal,
    tip_percent: Decimal,
    number_of_people: i64,
    split: SplitResult,
}

impl NewCalculation {
    pub fn compute(
        bill_amount: Decimal,
        tip_percent: Decimal,
        number_of_people: Decimal,
    ) -> Result<Self> {
        let split = split::compute_split(bill_amount, tip_percent, number_of_people)?;

        Ok(Self {
            bill_amount,
            tip_percent,
            number_of_people: split::party_size(number_of_people)?,
            split,
        })
    }

    pub fn bill_amount(&self) -> Decimal {
        self.bill_amount
    }

    pub fn tip_percent(&self) -> Decimal {
        self.tip_percent
    }

    pub fn number_of_people(&self) -> i64 {
        self.number_of_people
    }

    pub fn split(&self) -> &SplitResult {
        &self.split
    }
}

impl Calculation {
    pub fn split(&self) -> SplitResult {
        SplitResult {
            tip_amount: self.tip_amount,
            total_with_tip: self.total_with_tip,
            amount_per_person: self.amount_per_person,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_calculation_derives_amounts() {
        let new = NewCalculation::compute(
            "80".parse().unwrap(),
            "20".parse().unwrap(),
            "4".parse().unwrap(),
        )
        .unwrap();

        assert_eq!(new.number_of_people(), 4);
        assert_eq!(new.split().tip_amount.to_string(), "16.00");
        assert_eq!(new.split().total_with_tip.to_string(), "96.00");
        assert_eq!(new.split().amount_per_person.to_string(), "24.00");
    }

    #[test]
    fn test_calculation_serializes_camel_case_numbers() {
        let calculation = Calculation {
            id: 7,
            bill_amount: "100".parse().unwrap(),
            tip_percent: "10".parse().unwrap(),
            number_of_people: 2,
            tip_amount: "10.00".parse().unwrap(),
            total_with_tip: "110.00".parse().unwrap(),
            amount_per_person: "55.00".parse().unwrap(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&calculation).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["billAmount"], 100.0);
        assert_eq!(json["numberOfPeople"], 2);
        assert_eq!(json["amountPerPerson"], 55.0);
        assert!(json["createdAt"].is_string());
    }
}
