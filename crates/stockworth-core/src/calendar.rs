use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket size for the vesting calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Yearly => write!(f, "yearly"),
        }
    }
}

/// First day of the period containing `date`: the 1st of the month for
/// monthly buckets, January 1st for yearly ones.
pub fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    let offset = match granularity {
        Granularity::Monthly => date.day0(),
        Granularity::Yearly => date.ordinal0(),
    };
    date - Days::new(u64::from(offset))
}

/// Display label for a period, e.g. `Mar 2027` or `2027`.
pub fn period_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Monthly => date.format("%b %Y").to_string(),
        Granularity::Yearly => date.format("%Y").to_string(),
    }
}

/// Calendar distance between two dates expressed as whole years, then whole
/// months, then remaining days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDelta {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl DateDelta {
    /// Distance from `from` forward to `to`. Month arithmetic clamps to the
    /// end of short months (Jan 31 + 1 month = Feb 28/29). A `to` on or
    /// before `from` yields the zero delta.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        if to <= from {
            return DateDelta::default();
        }

        let month_span = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
        let mut months = month_span.max(0) as u32;
        if shift_months(from, months) > to {
            months -= 1;
        }
        let days = (to - shift_months(from, months)).num_days();

        DateDelta {
            years: months / 12,
            months: months % 12,
            days: days.max(0) as u32,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

impl fmt::Display for DateDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years, {} months, and {} days",
            self.years, self.months, self.days
        )
    }
}

fn shift_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_start_monthly() {
        assert_eq!(period_start(ymd(2027, 3, 17), Granularity::Monthly), ymd(2027, 3, 1));
        assert_eq!(period_start(ymd(2027, 3, 1), Granularity::Monthly), ymd(2027, 3, 1));
    }

    #[test]
    fn test_period_start_yearly() {
        assert_eq!(period_start(ymd(2027, 11, 30), Granularity::Yearly), ymd(2027, 1, 1));
        assert_eq!(period_start(ymd(2028, 12, 31), Granularity::Yearly), ymd(2028, 1, 1));
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(period_label(ymd(2027, 3, 1), Granularity::Monthly), "Mar 2027");
        assert_eq!(period_label(ymd(2027, 1, 1), Granularity::Yearly), "2027");
    }

    #[test]
    fn test_delta_mixed() {
        let delta = DateDelta::between(ymd(2026, 10, 16), ymd(2028, 1, 20));
        assert_eq!(
            delta,
            DateDelta {
                years: 1,
                months: 3,
                days: 4
            }
        );
        assert_eq!(delta.to_string(), "1 years, 3 months, and 4 days");
    }

    #[test]
    fn test_delta_day_of_month_borrow() {
        // Oct 20 -> Dec 5 is one month (to Nov 20) plus 15 days
        let delta = DateDelta::between(ymd(2026, 10, 20), ymd(2026, 12, 5));
        assert_eq!(delta.years, 0);
        assert_eq!(delta.months, 1);
        assert_eq!(delta.days, 15);
    }

    #[test]
    fn test_delta_end_of_month_clamp() {
        let delta = DateDelta::between(ymd(2027, 1, 31), ymd(2027, 2, 28));
        assert_eq!(delta.months, 1);
        assert_eq!(delta.days, 0);
    }

    #[test]
    fn test_delta_past_is_zero() {
        let delta = DateDelta::between(ymd(2027, 5, 1), ymd(2026, 5, 1));
        assert!(delta.is_zero());
        assert!(DateDelta::between(ymd(2027, 5, 1), ymd(2027, 5, 1)).is_zero());
    }
}
