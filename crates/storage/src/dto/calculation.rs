use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Calculation, NewCalculation};
use crate::services::split::{self, SplitResult};

/// Request payload for calculating (and optionally saving) a bill split
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100.0)]
    #[validate(custom(function = "validate_bill_amount"))]
    pub bill_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15.0)]
    #[validate(custom(function = "validate_tip_percent"))]
    pub tip_percent: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = i64, example = 2)]
    #[validate(custom(function = "validate_number_of_people"))]
    pub number_of_people: Decimal,
}

impl CalculationRequest {
    pub fn new(bill_amount: Decimal, tip_percent: Decimal, number_of_people: Decimal) -> Self {
        Self {
            bill_amount,
            tip_percent,
            number_of_people,
        }
    }

    pub fn compute(&self) -> crate::error::Result<NewCalculation> {
        NewCalculation::compute(self.bill_amount, self.tip_percent, self.number_of_people)
    }
}

/// Result of a calculation; `calculationId` is present only when it was saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15.0)]
    pub tip_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 115.0)]
    pub total_with_tip: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 57.5)]
    pub amount_per_person: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_id: Option<i64>,
}

impl From<SplitResult> for CalculationResponse {
    fn from(split: SplitResult) -> Self {
        Self {
            tip_amount: split.tip_amount,
            total_with_tip: split.total_with_tip,
            amount_per_person: split.amount_per_person,
            calculation_id: None,
        }
    }
}

impl From<Calculation> for CalculationResponse {
    fn from(calculation: Calculation) -> Self {
        Self {
            calculation_id: Some(calculation.id),
            ..Self::from(calculation.split())
        }
    }
}

// Validation helpers
fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_bill_amount(bill_amount: &Decimal) -> Result<(), ValidationError> {
    split::validate_bill_amount(*bill_amount)
        .map_err(|_| invalid("bill_amount_not_positive", "billAmount must be greater than 0"))
}

fn validate_tip_percent(tip_percent: &Decimal) -> Result<(), ValidationError> {
    split::validate_tip_percent(*tip_percent)
        .map_err(|_| invalid("tip_percent_negative", "tipPercent cannot be negative"))
}

fn validate_number_of_people(number_of_people: &Decimal) -> Result<(), ValidationError> {
    split::party_size(*number_of_people).map(|_| ()).map_err(|_| {
        invalid(
            "number_of_people_invalid",
            "numberOfPeople must be a whole number of at least 1",
        )
    })
}
