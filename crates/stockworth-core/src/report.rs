use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{DateDelta, Granularity};
use crate::grants::{validate_grant_book, GrantBook};
use crate::schedule::{VestingBin, VestingSchedule};
use crate::threshold::solve_thresholds;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::StockworthResult;

/// Everything needed to value a person's equity on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityReportInput {
    /// Ticker symbol, echoed back for presentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Share price used for every grant
    pub current_price: Money,
    /// The day treated as "today" for vested / unvested partitioning
    pub as_of: NaiveDate,
    /// Flat tax haircut applied to every unit (0.35 = 35%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Rate>,
    /// Vesting calendar bucket size
    #[serde(default)]
    pub granularity: Granularity,
    /// Walk-away amounts to resolve into dates
    #[serde(default)]
    pub thresholds: Vec<Money>,
    /// RSU and option grants
    #[serde(flatten)]
    pub grants: GrantBook,
}

/// A resolved walk-away target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdReport {
    pub amount: Money,
    pub date: NaiveDate,
    /// True when the date is on or before `as_of`
    pub already_met: bool,
    pub time_remaining: DateDelta,
}

/// Output of the equity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub current_price: Money,
    pub as_of: NaiveDate,
    pub granularity: Granularity,
    pub unit_count: usize,
    /// Value once everything has vested
    pub total_value: Money,
    /// Value vested on or before `as_of`
    pub vested_value: Money,
    /// Value forfeited by leaving on `as_of`
    pub unvested_value: Money,
    pub schedule: Vec<VestingBin>,
    pub thresholds: Vec<ThresholdReport>,
}

/// Value a grant book and answer the walk-away questions.
///
/// Grants are converted to units at `current_price` (options at their spread,
/// floored at zero) with the optional flat tax haircut, then aggregated into
/// vested / unvested totals, a vesting calendar and one resolved date per
/// threshold target.
pub fn compute_equity_report(
    input: &EquityReportInput,
) -> StockworthResult<ComputationOutput<EquityReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    let tax_rate = input.tax_rate.unwrap_or(Decimal::ZERO);
    validate_grant_book(&input.grants, input.current_price, tax_rate)?;

    if input.grants.is_empty() {
        warnings.push("No RSU or option grants supplied; all values are zero".into());
    }
    for grant in input.grants.underwater_options(input.current_price) {
        warnings.push(format!(
            "Option vesting {} is underwater (strike {} >= price {}); valued at zero",
            grant.vest_date, grant.strike_price, input.current_price
        ));
    }
    for amount in input.thresholds.iter().filter(|a| **a < Decimal::ZERO) {
        warnings.push(format!(
            "Negative threshold {amount} treated as full vesting"
        ));
    }

    // --- Valuation ---
    let collection = input.grants.to_collection(input.current_price, tax_rate)?;
    let total_value = collection.total_value();
    let vested_value = collection.vested_value(input.as_of);
    let unvested_value = total_value - vested_value;

    // --- Vesting calendar ---
    let schedule = VestingSchedule::build(&collection, input.as_of, input.granularity);
    let granularity = schedule.granularity();
    let schedule = schedule.bins();

    // --- Thresholds ---
    let thresholds = if input.thresholds.is_empty() {
        Vec::new()
    } else {
        solve_thresholds(&collection, &input.thresholds)?
    };
    let thresholds: Vec<ThresholdReport> = thresholds
        .into_iter()
        .map(|t| {
            let already_met = t.is_met_by(input.as_of);
            if already_met && t.amount > Decimal::ZERO {
                warnings.push(format!(
                    "Unvested value of {} is already at or below {} as of {}",
                    unvested_value, t.amount, input.as_of
                ));
            }
            ThresholdReport {
                amount: t.amount,
                date: t.date,
                already_met,
                time_remaining: t.time_remaining(input.as_of),
            }
        })
        .collect();

    let output = EquityReport {
        symbol: input.symbol.clone(),
        current_price: input.current_price,
        as_of: input.as_of,
        granularity,
        unit_count: collection.len(),
        total_value,
        vested_value,
        unvested_value,
        schedule,
        thresholds,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Step-function vesting valuation with ascending vest-date threshold scan",
        input,
        warnings,
        elapsed,
        output,
    ))
}
