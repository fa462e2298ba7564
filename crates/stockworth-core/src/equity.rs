use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StockworthError;
use crate::types::{Money, Rate, Shares};
use crate::StockworthResult;

/// A single lot of equity that becomes owned on `vest_date`.
///
/// Units are not useful on their own; a grant with several vesting events is
/// modelled as an [`EquityCollection`](crate::EquityCollection) of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityUnit {
    /// Date the unit becomes unconditionally owned
    pub vest_date: NaiveDate,
    /// Value of the unit once vested, fixed at construction
    pub value: Money,
}

impl EquityUnit {
    pub fn new(vest_date: NaiveDate, value: Money) -> Self {
        EquityUnit { vest_date, value }
    }

    /// Value of the unit on `target`: the full value from the vest date
    /// onwards, zero before it.
    pub fn value_at(&self, target: NaiveDate) -> Money {
        if self.is_vested_by(target) {
            self.value
        } else {
            Decimal::ZERO
        }
    }

    pub fn is_vested_by(&self, target: NaiveDate) -> bool {
        target >= self.vest_date
    }

    /// Value a restricted stock unit lot.
    ///
    /// value = current_price * quantity * (1 - tax_rate)
    ///
    /// No sign checks are made on price or quantity; see
    /// [`validate_grant_book`](crate::grants::validate_grant_book) for the
    /// rejection policy applied to configured grants.
    pub fn from_rsu(
        current_price: Money,
        quantity: Shares,
        vest_date: impl IntoVestDate,
        tax_rate: Rate,
    ) -> StockworthResult<Self> {
        let vest_date = vest_date.into_vest_date()?;
        let value = after_tax(current_price * quantity, tax_rate);
        Ok(EquityUnit::new(vest_date, value))
    }

    /// Value a stock option lot at its exercise spread.
    ///
    /// purchase = quantity * strike_price
    /// sale     = current_price * quantity
    /// value    = max(sale - purchase, 0) * (1 - tax_rate)
    ///
    /// An option that is at or under water is worth nothing: the holder
    /// simply does not exercise, so the value never goes negative.
    pub fn from_option(
        current_price: Money,
        quantity: Shares,
        vest_date: impl IntoVestDate,
        strike_price: Money,
        tax_rate: Rate,
    ) -> StockworthResult<Self> {
        let vest_date = vest_date.into_vest_date()?;
        let purchase_price = quantity * strike_price;
        let sale_price = current_price * quantity;
        let spread = (sale_price - purchase_price).max(Decimal::ZERO);
        Ok(EquityUnit::new(vest_date, after_tax(spread, tax_rate)))
    }
}

impl fmt::Display for EquityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {})", self.vest_date, self.value.round_dp(2))
    }
}

fn after_tax(value: Money, tax_rate: Rate) -> Money {
    value * (Decimal::ONE - tax_rate)
}

// ---------------------------------------------------------------------------
// Vest date conversion
// ---------------------------------------------------------------------------

/// Anything that can stand in for a vest date: a parsed `NaiveDate` or an
/// ISO-8601 (`YYYY-MM-DD`) string.
pub trait IntoVestDate {
    fn into_vest_date(self) -> StockworthResult<NaiveDate>;
}

impl IntoVestDate for NaiveDate {
    fn into_vest_date(self) -> StockworthResult<NaiveDate> {
        Ok(self)
    }
}

impl IntoVestDate for &str {
    fn into_vest_date(self) -> StockworthResult<NaiveDate> {
        parse_vest_date(self)
    }
}

impl IntoVestDate for &String {
    fn into_vest_date(self) -> StockworthResult<NaiveDate> {
        parse_vest_date(self)
    }
}

impl IntoVestDate for String {
    fn into_vest_date(self) -> StockworthResult<NaiveDate> {
        parse_vest_date(&self)
    }
}

/// Parse an ISO-8601 calendar date (`2027-02-15`).
pub fn parse_vest_date(value: &str) -> StockworthResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        StockworthError::DateParse {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_vested_by() {
        let today = ymd(2026, 10, 16);
        let unit = EquityUnit::new(today, dec!(100));

        assert!(unit.is_vested_by(ymd(2026, 10, 17)));
        assert!(unit.is_vested_by(today));
        assert!(!unit.is_vested_by(ymd(2026, 10, 15)));
    }

    #[test]
    fn test_value_at_step() {
        let unit = EquityUnit::new(ymd(2027, 1, 1), dec!(250));
        assert_eq!(unit.value_at(ymd(2026, 12, 31)), Decimal::ZERO);
        assert_eq!(unit.value_at(ymd(2027, 1, 1)), dec!(250));
        assert_eq!(unit.value_at(ymd(2040, 1, 1)), dec!(250));
    }

    #[test]
    fn test_from_rsu() {
        let unit = EquityUnit::from_rsu(dec!(12.5), dec!(5), "2020-07-08", Decimal::ZERO).unwrap();
        assert_eq!(unit.vest_date, ymd(2020, 7, 8));
        assert_eq!(unit.value, dec!(62.5));
    }

    #[test]
    fn test_from_rsu_with_tax() {
        let unit = EquityUnit::from_rsu(dec!(10), dec!(100), ymd(2027, 1, 1), dec!(0.35)).unwrap();
        assert_eq!(unit.value, dec!(650));
    }

    #[test]
    fn test_from_option() {
        let unit =
            EquityUnit::from_option(dec!(15), dec!(5), "2021-02-03", dec!(14), Decimal::ZERO)
                .unwrap();
        assert_eq!(unit.vest_date, ymd(2021, 2, 3));
        assert_eq!(unit.value, dec!(5));
    }

    #[test]
    fn test_from_option_underwater() {
        let unit =
            EquityUnit::from_option(dec!(10), dec!(5), ymd(2026, 10, 16), dec!(14), Decimal::ZERO)
                .unwrap();
        assert_eq!(unit.value, Decimal::ZERO);
    }

    #[test]
    fn test_from_option_precisely_worthless() {
        let unit =
            EquityUnit::from_option(dec!(10), dec!(5), ymd(2026, 10, 16), dec!(10), Decimal::ZERO)
                .unwrap();
        assert_eq!(unit.value, Decimal::ZERO);
    }

    #[test]
    fn test_from_option_underwater_with_tax_stays_zero() {
        let unit =
            EquityUnit::from_option(dec!(8), dec!(50), ymd(2027, 6, 1), dec!(20), dec!(0.4))
                .unwrap();
        assert_eq!(unit.value, Decimal::ZERO);
    }

    #[test]
    fn test_from_option_with_tax() {
        // spread = (30 - 20) * 50 = 500, after 40% tax = 300
        let unit =
            EquityUnit::from_option(dec!(30), dec!(50), ymd(2027, 6, 1), dec!(20), dec!(0.4))
                .unwrap();
        assert_eq!(unit.value, dec!(300));
    }

    #[test]
    fn test_negative_quantity_passes_through() {
        let unit = EquityUnit::from_rsu(dec!(10), dec!(-3), ymd(2027, 1, 1), Decimal::ZERO).unwrap();
        assert_eq!(unit.value, dec!(-30));
    }

    #[test]
    fn test_bad_date_string() {
        let err = EquityUnit::from_rsu(dec!(10), dec!(1), "2027-13-01", Decimal::ZERO).unwrap_err();
        match err {
            StockworthError::DateParse { value, .. } => assert_eq!(value, "2027-13-01"),
            other => panic!("Expected DateParse, got {other:?}"),
        }
        assert!(parse_vest_date("next tuesday").is_err());
        assert!(parse_vest_date("02/15/2027").is_err());
    }

    #[test]
    fn test_display() {
        let unit = EquityUnit::new(ymd(2027, 2, 15), dec!(1234.567));
        assert_eq!(unit.to_string(), "(2027-02-15 -> 1234.57)");
    }
}
