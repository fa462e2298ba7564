use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{period_label, period_start, Granularity};
use crate::collection::EquityCollection;
use crate::equity::EquityUnit;
use crate::types::Money;

/// Label used for the bucket holding everything already vested.
pub const VESTED_LABEL: &str = "Vested";

/// Key of a vesting calendar bucket.
///
/// Variant order is the sort order: `Vested` comes before every period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BinKey {
    Vested,
    Period(NaiveDate),
}

impl BinKey {
    /// Bucket for `unit` as seen on `as_of`.
    pub fn for_unit(unit: &EquityUnit, as_of: NaiveDate, granularity: Granularity) -> Self {
        if unit.vest_date <= as_of {
            BinKey::Vested
        } else {
            BinKey::Period(period_start(unit.vest_date, granularity))
        }
    }

    pub fn label(&self, granularity: Granularity) -> String {
        match self {
            BinKey::Vested => VESTED_LABEL.to_string(),
            BinKey::Period(start) => period_label(*start, granularity),
        }
    }
}

/// One presentable row of the vesting calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingBin {
    pub label: String,
    /// First day of the period; absent for the vested bucket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    pub value: Money,
}

/// Pending equity value grouped by vesting period, with everything vested
/// on or before `as_of` collapsed into a single bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct VestingSchedule {
    granularity: Granularity,
    bins: BTreeMap<BinKey, Money>,
}

impl VestingSchedule {
    pub fn build(collection: &EquityCollection, as_of: NaiveDate, granularity: Granularity) -> Self {
        let mut bins: BTreeMap<BinKey, Money> = BTreeMap::new();
        for unit in collection.units() {
            let key = BinKey::for_unit(unit, as_of, granularity);
            *bins.entry(key).or_insert(Decimal::ZERO) += unit.value;
        }
        VestingSchedule { granularity, bins }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn get(&self, key: BinKey) -> Option<Money> {
        self.bins.get(&key).copied()
    }

    /// Sum over all buckets; equals the collection's total value.
    pub fn total(&self) -> Money {
        self.bins.values().copied().sum()
    }

    /// Buckets in presentation order (vested first, then by period).
    pub fn bins(&self) -> Vec<VestingBin> {
        self.bins
            .iter()
            .map(|(key, value)| VestingBin {
                label: key.label(self.granularity),
                period_start: match key {
                    BinKey::Vested => None,
                    BinKey::Period(start) => Some(*start),
                },
                value: *value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn as_of() -> NaiveDate {
        ymd(2026, 10, 16)
    }

    fn sample() -> EquityCollection {
        EquityCollection::new(vec![
            EquityUnit::new(ymd(2026, 9, 6), dec!(100)),
            EquityUnit::new(ymd(2026, 10, 16), dec!(50)),
            EquityUnit::new(ymd(2026, 12, 1), dec!(10)),
            EquityUnit::new(ymd(2026, 12, 3), dec!(10)),
            EquityUnit::new(ymd(2027, 2, 15), dec!(40)),
            EquityUnit::new(ymd(2027, 10, 16), dec!(1)),
        ])
    }

    #[test]
    fn test_monthly_bins() {
        let schedule = VestingSchedule::build(&sample(), as_of(), Granularity::Monthly);
        let rows: Vec<(String, Money)> = schedule
            .bins()
            .into_iter()
            .map(|b| (b.label, b.value))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Vested".to_string(), dec!(150)),
                ("Dec 2026".to_string(), dec!(20)),
                ("Feb 2027".to_string(), dec!(40)),
                ("Oct 2027".to_string(), dec!(1)),
            ]
        );
    }

    #[test]
    fn test_yearly_bins() {
        let schedule = VestingSchedule::build(&sample(), as_of(), Granularity::Yearly);
        let bins = schedule.bins();
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].label, VESTED_LABEL);
        assert_eq!(bins[0].period_start, None);
        assert_eq!(bins[2].period_start, Some(ymd(2027, 1, 1)));
        assert_eq!(schedule.granularity(), Granularity::Yearly);
        assert_eq!(bins[1].label, "2026");
        assert_eq!(bins[1].value, dec!(20));
        assert_eq!(bins[2].label, "2027");
        assert_eq!(bins[2].value, dec!(41));
        assert_eq!(schedule.get(BinKey::Period(ymd(2027, 1, 1))), Some(dec!(41)));
    }

    #[test]
    fn test_vested_sorts_before_any_period() {
        assert!(BinKey::Vested < BinKey::Period(NaiveDate::MIN));
        assert!(BinKey::Period(ymd(2026, 1, 1)) < BinKey::Period(ymd(2026, 2, 1)));
    }

    #[test]
    fn test_empty_collection_has_no_bins() {
        let schedule = VestingSchedule::build(&EquityCollection::default(), as_of(), Granularity::Monthly);
        assert!(schedule.is_empty());
        assert!(schedule.bins().is_empty());
    }

    #[test]
    fn test_all_vested_single_bin() {
        let c = EquityCollection::new(vec![
            EquityUnit::new(ymd(2024, 1, 1), dec!(5)),
            EquityUnit::new(ymd(2025, 6, 1), dec!(7)),
        ]);
        let schedule = VestingSchedule::build(&c, as_of(), Granularity::Monthly);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.get(BinKey::Vested), Some(c.total_value()));
    }

    #[test]
    fn test_sum_matches_total() {
        let c = sample();
        for g in [Granularity::Monthly, Granularity::Yearly] {
            assert_eq!(VestingSchedule::build(&c, as_of(), g).total(), c.total_value());
        }
    }
}
