//! Walk-away thresholds.
//!
//! A threshold answers "how long do I have to stay to leave less than X on
//! the table?": the earliest vest date on or after which the unvested
//! remainder of a collection drops below X.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::DateDelta;
use crate::collection::EquityCollection;
use crate::error::StockworthError;
use crate::types::Money;
use crate::StockworthResult;

/// A target amount and the vest date that satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub amount: Money,
    pub date: NaiveDate,
}

impl Threshold {
    /// Time left from `as_of` until the threshold date (zero once reached).
    pub fn time_remaining(&self, as_of: NaiveDate) -> DateDelta {
        DateDelta::between(as_of, self.date)
    }

    pub fn is_met_by(&self, as_of: NaiveDate) -> bool {
        as_of >= self.date
    }
}

/// Resolve a single target amount against `collection`.
///
/// Scans the distinct vest dates in ascending order and returns the first
/// date whose vested value reaches `total - amount`. Reaching the floor
/// exactly counts, so the unvested remainder is at most `amount` on the
/// returned date and below it from then on.
///
/// A non-positive amount requires full vesting and always resolves to the
/// final vest date, even when later units are worth nothing.
pub fn solve_threshold(collection: &EquityCollection, amount: Money) -> StockworthResult<Threshold> {
    let dates = collection.vesting_dates()?;
    let last = collection.last_vest_date().ok_or_else(|| {
        StockworthError::EmptyCollection("cannot resolve a threshold without vest dates".into())
    })?;

    if amount <= Decimal::ZERO {
        return Ok(Threshold { amount, date: last });
    }

    let vested_floor = collection.total_value() - amount;
    let date = dates
        .iter()
        .copied()
        .find(|d| collection.value_at(*d) >= vested_floor)
        .unwrap_or(last);

    Ok(Threshold { amount, date })
}

/// Resolve every target independently, preserving input order.
pub fn solve_thresholds(
    collection: &EquityCollection,
    amounts: &[Money],
) -> StockworthResult<Vec<Threshold>> {
    amounts
        .iter()
        .map(|amount| solve_threshold(collection, *amount))
        .collect()
}
