use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Derived amounts of a bill split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    pub tip_amount: Decimal,
    pub total_with_tip: Decimal,
    pub amount_per_person: Decimal,
}

/// Split a bill with tip across a party.
///
/// Each step is rounded half-up to cents before the next one runs:
/// the tip, then bill + tip, then the per-person share. Rounding only the
/// final values gives different results for some inputs, so the order
/// matters for matching stored history.
pub fn compute_split(
    bill_amount: Decimal,
    tip_percent: Decimal,
    number_of_people: Decimal,
) -> Result<SplitResult> {
    validate_bill_amount(bill_amount)?;
    validate_tip_percent(tip_percent)?;
    let people = party_size(number_of_people)?;

    let tip_amount = bill_amount
        .checked_mul(tip_percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(round_cents)
        .ok_or_else(overflow)?;

    let total_with_tip = bill_amount
        .checked_add(tip_amount)
        .map(round_cents)
        .ok_or_else(overflow)?;

    let amount_per_person = total_with_tip
        .checked_div(Decimal::from(people))
        .map(round_cents)
        .ok_or_else(overflow)?;

    Ok(SplitResult {
        tip_amount,
        total_with_tip,
        amount_per_person,
    })
}

/// Party size as a whole number of people (at least one).
pub fn party_size(number_of_people: Decimal) -> Result<i64> {
    if !number_of_people.fract().is_zero() {
        return Err(StorageError::invalid_input(
            "numberOfPeople must be a whole number",
        ));
    }

    match number_of_people.to_i64() {
        Some(people) if people >= 1 => Ok(people),
        Some(_) => Err(StorageError::invalid_input(
            "numberOfPeople must be at least 1",
        )),
        None => Err(overflow()),
    }
}

pub fn validate_bill_amount(bill_amount: Decimal) -> Result<()> {
    if bill_amount <= Decimal::ZERO {
        return Err(StorageError::invalid_input(
            "billAmount must be greater than 0",
        ));
    }
    Ok(())
}

pub fn validate_tip_percent(tip_percent: Decimal) -> Result<()> {
    if tip_percent < Decimal::ZERO {
        return Err(StorageError::invalid_input("tipPercent cannot be negative"));
    }
    Ok(())
}

/// Round half-up (away from zero) to two decimal places, always keeping a
/// scale of two so `10` is stored as `10.00`.
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn overflow() -> StorageError {
    StorageError::invalid_input("amounts are too large to calculate")
}
