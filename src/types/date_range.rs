//! Inclusive calendar date ranges and their compact `YYYYMMDD` form.

use crate::dataset::error::DatasetError;
use chrono::{Datelike, NaiveDate, Utc};
use std::fmt;
use std::ops::RangeInclusive;

const COMPACT_FORMAT: &str = "%Y%m%d";

/// An inclusive range of calendar dates with `start <= end`.
///
/// Dates are rendered as 8-digit `YYYYMMDD` strings wherever they feed a cache key
/// or an upstream request, so the textual form is stable across callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, failing with [`DatasetError::InvalidDateRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DatasetError> {
        if start > end {
            return Err(DatasetError::InvalidDateRange {
                start: format_compact(start),
                end: format_compact(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Fills in missing bounds relative to `today`.
    ///
    /// A missing start becomes January 1st of the previous year, a missing end becomes `today`.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, DatasetError> {
        let start = match start {
            Some(start) => start,
            None => NaiveDate::from_ymd_opt(today.year() - 1, 1, 1)
                .ok_or_else(|| DatasetError::InvalidDate(format!("year {}", today.year() - 1)))?,
        };
        Self::new(start, end.unwrap_or(today))
    }

    /// Same as [`DateRange::resolve`], using the current UTC calendar date.
    pub fn resolve_today(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, DatasetError> {
        Self::resolve(start, end, Utc::now().date_naive())
    }

    /// The full calendar year `year` (January 1st through December 31st).
    pub fn full_year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_key(&self) -> String {
        format_compact(self.start)
    }

    pub fn end_key(&self) -> String {
        format_compact(self.end)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    /// One full-year span per calendar year touched by this range, in increasing order.
    pub fn year_spans(&self) -> Vec<(i32, DateRange)> {
        self.years()
            .filter_map(|year| Self::full_year(year).map(|span| (year, span)))
            .collect()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_key(), self.end_key())
    }
}

/// Parses an 8-digit `YYYYMMDD` date.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidDate`] for anything that is not exactly eight digits
/// forming a real calendar date.
pub fn parse_compact_date(value: &str) -> Result<NaiveDate, DatasetError> {
    let trimmed = value.trim();
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DatasetError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, COMPACT_FORMAT)
        .map_err(|_| DatasetError::InvalidDate(value.to_string()))
}

pub fn format_compact(date: NaiveDate) -> String {
    date.format(COMPACT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_defaults_to_previous_year_start_through_today() {
        let today = date(2026, 10, 15);
        let range = DateRange::resolve(None, None, today).unwrap();
        assert_eq!(range.start(), date(2025, 1, 1));
        assert_eq!(range.end(), today);
        assert_eq!(range.start_key(), "20250101");
        assert_eq!(range.end_key(), "20261015");
    }

    #[test]
    fn test_resolve_keeps_explicit_bounds() {
        let range = DateRange::resolve(
            Some(date(2025, 1, 1)),
            Some(date(2025, 1, 5)),
            date(2026, 10, 15),
        )
        .unwrap();
        assert_eq!(range.to_string(), "20250101-20250105");
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let err = DateRange::new(date(2025, 2, 1), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_year_spans_cover_full_years_in_order() {
        let range = DateRange::new(date(2022, 6, 15), date(2024, 2, 1)).unwrap();
        let spans = range.year_spans();
        let years: Vec<i32> = spans.iter().map(|(year, _)| *year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);
        assert_eq!(spans[0].1.start_key(), "20220101");
        assert_eq!(spans[0].1.end_key(), "20221231");
        assert_eq!(spans[2].1.end_key(), "20241231");
    }

    #[test]
    fn test_parse_compact_date() {
        assert_eq!(parse_compact_date("20250105").unwrap(), date(2025, 1, 5));
        assert!(parse_compact_date("2025-01-05").is_err());
        assert!(parse_compact_date("2025010").is_err());
        assert!(parse_compact_date("20250230").is_err());
        assert!(parse_compact_date("+2025010").is_err());
    }
}
