use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::equity::EquityUnit;
use crate::error::StockworthError;
use crate::types::Money;
use crate::StockworthResult;

/// Every equity unit held by one person, across all grants.
///
/// Value only changes on a vest date, so `value_at` is a non-decreasing step
/// function whose break points are exactly the distinct vest dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquityCollection {
    units: Vec<EquityUnit>,
    vesting_dates: BTreeSet<NaiveDate>,
}

impl EquityCollection {
    pub fn new(units: Vec<EquityUnit>) -> Self {
        let vesting_dates = units.iter().map(|u| u.vest_date).collect();
        EquityCollection {
            units,
            vesting_dates,
        }
    }

    pub fn units(&self) -> &[EquityUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Value once every unit has vested.
    pub fn total_value(&self) -> Money {
        self.units.iter().map(|u| u.value).sum()
    }

    pub fn value_at(&self, target: NaiveDate) -> Money {
        self.units.iter().map(|u| u.value_at(target)).sum()
    }

    /// Value already vested as of `today`. The caller supplies the date.
    pub fn vested_value(&self, today: NaiveDate) -> Money {
        self.value_at(today)
    }

    /// What would be walked away from by leaving on `today`.
    pub fn unvested_value(&self, today: NaiveDate) -> Money {
        self.total_value() - self.vested_value(today)
    }

    /// Distinct vest dates in ascending order.
    pub fn vesting_dates(&self) -> StockworthResult<&BTreeSet<NaiveDate>> {
        if self.vesting_dates.is_empty() {
            return Err(StockworthError::EmptyCollection(
                "no vesting dates in a collection with zero units".into(),
            ));
        }
        Ok(&self.vesting_dates)
    }

    /// Date on which the last unit vests, if there are any units.
    pub fn last_vest_date(&self) -> Option<NaiveDate> {
        self.vesting_dates.iter().next_back().copied()
    }
}

impl FromIterator<EquityUnit> for EquityCollection {
    fn from_iter<I: IntoIterator<Item = EquityUnit>>(iter: I) -> Self {
        EquityCollection::new(iter.into_iter().collect())
    }
}

impl From<Vec<EquityUnit>> for EquityCollection {
    fn from(units: Vec<EquityUnit>) -> Self {
        EquityCollection::new(units)
    }
}
