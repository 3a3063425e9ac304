//! Reporting date range resolution
//!
//! Billing reports cover a half-open `[start, end)` range of calendar dates.
//! Either bound may be omitted: the end defaults to today and the start to
//! thirty days before the end. Resolution is a pure function of its inputs,
//! with "today" passed in by the caller.

use crate::error::{CloudspendError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of days covered when no start date is given
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// Accepted input format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated reporting range
///
/// # Examples
/// ```
/// use cloudspend_core::date_range::DateRange;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
/// let range = DateRange::resolve(None, Some("2025-03-31"), today).unwrap();
/// assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive first day
    pub start: NaiveDate,
    /// Exclusive last day
    pub end: NaiveDate,
}

impl DateRange {
    /// Resolve optional `YYYY-MM-DD` bounds against `today`
    ///
    /// # Errors
    ///
    /// - `InvalidDateFormat` if a supplied bound does not parse
    /// - `FutureStartDate` if the resolved start is after `today`
    /// - `NonPositiveRange` if the resolved end is not after the start
    pub fn resolve(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let end = match end {
            Some(s) => parse_date(s)?,
            None => today,
        };
        let start = match start {
            Some(s) => parse_date(s)?,
            None => end
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .ok_or_else(|| CloudspendError::InvalidDateFormat(end.to_string()))?,
        };

        if start > today {
            return Err(CloudspendError::FutureStartDate { start, today });
        }
        if end <= start {
            return Err(CloudspendError::NonPositiveRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// Whether `date` falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Number of days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse a date in the fixed `YYYY-MM-DD` format
///
/// Only four-digit years are accepted, so the result always leaves room for
/// the default lookback.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let well_formed = date_str.len() == 10
        && date_str.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(CloudspendError::InvalidDateFormat(date_str.to_string()));
    }

    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .map_err(|_| CloudspendError::InvalidDateFormat(date_str.to_string()))
}
