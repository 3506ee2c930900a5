//! Time-window bounds derived from the requested period.
//!
//! Windows are anchored to a single year. Bounds are rendered as quoted
//! string literals compared against the trip's pickup timestamp.

use super::request::{DAY_RANGE, MONTH_RANGE};
use super::Period;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// One side of a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Inclusive(String),
    Exclusive(String),
}

impl Bound {
    fn render_lower(&self, column: &str) -> String {
        match self {
            Bound::Inclusive(ts) => format!("{} >= \"{}\"", column, ts),
            Bound::Exclusive(ts) => format!("{} > \"{}\"", column, ts),
        }
    }

    fn render_upper(&self, column: &str) -> String {
        match self {
            Bound::Inclusive(ts) => format!("{} <= \"{}\"", column, ts),
            Bound::Exclusive(ts) => format!("{} < \"{}\"", column, ts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl TimeWindow {
    /// Derive the window for a request, or `None` when the period carries no window.
    ///
    /// `day` covers one month. January has no lower bound and December no
    /// upper bound; every other month ends on day 31 whatever its length.
    /// `hour` covers one day, exclusive of its first instant.
    pub fn for_period(
        period: Period,
        month: Option<u32>,
        day: Option<u32>,
        year: i32,
    ) -> Result<Option<Self>> {
        match period {
            Period::Month => Ok(None),
            Period::Day => {
                let month = required("month", month, MONTH_RANGE)?;
                let window = match month {
                    1 => TimeWindow {
                        lower: None,
                        upper: Some(Bound::Inclusive(format!("{}-01-31 23:59:59", year))),
                    },
                    12 => TimeWindow {
                        lower: Some(Bound::Inclusive(format!("{}-12-01 00:00:00", year))),
                        upper: None,
                    },
                    m => TimeWindow {
                        lower: Some(Bound::Inclusive(format!("{}-{:02}-01T00:00:00", year, m))),
                        upper: Some(Bound::Inclusive(format!("{}-{:02}-31T23:59:59", year, m))),
                    },
                };
                Ok(Some(window))
            }
            Period::Hour => {
                let month = required("month", month, MONTH_RANGE)?;
                let day = required("day", day, DAY_RANGE)?;
                Ok(Some(TimeWindow {
                    lower: Some(Bound::Exclusive(format!(
                        "{}-{:02}-{:02}T00:00:00",
                        year, month, day
                    ))),
                    upper: Some(Bound::Inclusive(format!(
                        "{}-{:02}-{:02}T23:59:59",
                        year, month, day
                    ))),
                }))
            }
        }
    }

    /// Render as a predicate over `column`, lower bound first.
    pub fn predicate(&self, column: &str) -> String {
        let parts: Vec<String> = self
            .lower
            .iter()
            .map(|b| b.render_lower(column))
            .chain(self.upper.iter().map(|b| b.render_upper(column)))
            .collect();
        parts.join(" AND ")
    }
}

fn required(field: &str, value: Option<u32>, range: RangeInclusive<u32>) -> Result<u32> {
    let value = value.ok_or_else(|| Error::MissingParameter(field.to_string()))?;
    if !range.contains(&value) {
        return Err(Error::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMN: &str = "pickupDate";

    fn day_window(month: u32) -> TimeWindow {
        TimeWindow::for_period(Period::Day, Some(month), None, 2016)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_month_period_has_no_window() {
        assert!(TimeWindow::for_period(Period::Month, Some(4), Some(2), 2016)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_mid_year_months_end_on_day_31() {
        for month in 2..=11 {
            let predicate = day_window(month).predicate(COLUMN);
            assert_eq!(
                predicate,
                format!(
                    "pickupDate >= \"2016-{:02}-01T00:00:00\" AND pickupDate <= \"2016-{:02}-31T23:59:59\"",
                    month, month
                )
            );
        }
        // February and the 30-day months keep the literal day 31
        assert!(day_window(2).predicate(COLUMN).contains("2016-02-31T23:59:59"));
        assert!(day_window(6).predicate(COLUMN).contains("2016-06-31T23:59:59"));
    }

    #[test]
    fn test_january_only_upper_bound() {
        let window = day_window(1);
        assert!(window.lower.is_none());
        assert_eq!(
            window.predicate(COLUMN),
            "pickupDate <= \"2016-01-31 23:59:59\""
        );
    }

    #[test]
    fn test_december_only_lower_bound() {
        let window = day_window(12);
        assert!(window.upper.is_none());
        assert_eq!(
            window.predicate(COLUMN),
            "pickupDate >= \"2016-12-01 00:00:00\""
        );
    }

    #[test]
    fn test_hour_window_excludes_midnight() {
        let window = TimeWindow::for_period(Period::Hour, Some(5), Some(14), 2016)
            .unwrap()
            .unwrap();
        assert_eq!(window.lower, Some(Bound::Exclusive("2016-05-14T00:00:00".into())));
        assert_eq!(
            window.predicate(COLUMN),
            "pickupDate > \"2016-05-14T00:00:00\" AND pickupDate <= \"2016-05-14T23:59:59\""
        );
    }

    #[test]
    fn test_year_is_configurable() {
        let window = TimeWindow::for_period(Period::Day, Some(3), None, 2019)
            .unwrap()
            .unwrap();
        assert!(window.predicate(COLUMN).starts_with("pickupDate >= \"2019-03-01"));
    }

    #[test]
    fn test_missing_fields() {
        let err = TimeWindow::for_period(Period::Day, None, None, 2016).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(ref f) if f == "month"));

        let err = TimeWindow::for_period(Period::Hour, Some(5), None, 2016).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(ref f) if f == "day"));
    }

    #[test]
    fn test_out_of_range_fields() {
        let err = TimeWindow::for_period(Period::Day, Some(13), None, 2016).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { ref field, .. } if field == "month"));

        let err = TimeWindow::for_period(Period::Hour, Some(5), Some(0), 2016).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { ref field, .. } if field == "day"));
    }
}
