// crates/core/src/month.rs
//! Calendar month resolution.
//!
//! A [`MonthSpan`] is the inclusive `[first, last]` civil-date range of a
//! single calendar month, plus the exhaustive day list the densification
//! pass walks. All dates are UTC-civil; nothing here touches a clock.

use chrono::{Days, NaiveDate};

use crate::error::CalendarError;

/// The resolved date range of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    year: i32,
    month: u32,
    first: NaiveDate,
    last: NaiveDate,
}

impl MonthSpan {
    /// Resolve a (year, 1-based month) pair into its inclusive date range.
    ///
    /// The last day is computed as one day before the first of the
    /// following month, which handles 28/29/30/31-day months without a
    /// length table. `month` outside 1-12 is rejected, never clamped.
    pub fn resolve(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::YearOutOfRange { year })?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last = next_first
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .ok_or(CalendarError::YearOutOfRange { year })?;

        Ok(Self {
            year,
            month,
            first,
            last,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month (28-31).
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Every date in the month, ascending. Length equals the month's
    /// day count.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first
            .iter_days()
            .take_while(|d| *d <= self.last)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_january() {
        let span = MonthSpan::resolve(2024, 1).unwrap();
        assert_eq!(span.first(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(span.last(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(span.days().len(), 31);
    }

    #[test]
    fn test_resolve_leap_february() {
        let span = MonthSpan::resolve(2024, 2).unwrap();
        assert_eq!(span.last(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(span.days().len(), 29);
    }

    #[test]
    fn test_resolve_non_leap_february() {
        let span = MonthSpan::resolve(2023, 2).unwrap();
        assert_eq!(span.last(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(span.days().len(), 28);
    }

    #[test]
    fn test_century_leap_rule() {
        // 2000 was a leap year, 1900 was not
        assert_eq!(MonthSpan::resolve(2000, 2).unwrap().days().len(), 29);
        assert_eq!(MonthSpan::resolve(1900, 2).unwrap().days().len(), 28);
    }

    #[test]
    fn test_resolve_december_rolls_year() {
        let span = MonthSpan::resolve(2023, 12).unwrap();
        assert_eq!(span.last(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_days_are_ascending_and_bounded() {
        let span = MonthSpan::resolve(2024, 3).unwrap();
        let days = span.days();
        assert_eq!(days[0], span.first());
        assert_eq!(*days.last().unwrap(), span.last());
        for pair in days.windows(2) {
            assert_eq!(pair[1], pair[0].succ_opt().unwrap());
        }
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(matches!(
            MonthSpan::resolve(2024, 0),
            Err(CalendarError::InvalidMonth { month: 0 })
        ));
        assert!(matches!(
            MonthSpan::resolve(2024, 13),
            Err(CalendarError::InvalidMonth { month: 13 })
        ));
    }

    #[test]
    fn test_degenerate_years_accepted() {
        assert!(MonthSpan::resolve(1, 1).is_ok());
        assert!(MonthSpan::resolve(-500, 6).is_ok());
        assert!(MonthSpan::resolve(9999, 12).is_ok());
    }

    /// Expected month length from the Gregorian rules, independent of the
    /// implementation under test.
    fn expected_len(year: i32, month: u32) -> usize {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => {
                let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
                if leap {
                    29
                } else {
                    28
                }
            }
            _ => unreachable!(),
        }
    }

    proptest! {
        #[test]
        fn prop_day_count_matches_gregorian_rule(year in -4000i32..4000, month in 1u32..=12) {
            let span = MonthSpan::resolve(year, month).unwrap();
            let days = span.days();
            prop_assert_eq!(days.len(), expected_len(year, month));
            prop_assert_eq!(days[0], span.first());
            prop_assert_eq!(*days.last().unwrap(), span.last());
            prop_assert_eq!(span.first().day(), 1);
        }
    }
}
