//! Visible date range of the calendar view.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// Date format used on the wire (`yyyy-MM-dd`).
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open range of days `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CalendarResult<Self> {
        let range = DateRange { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> CalendarResult<()> {
        if self.start > self.end {
            return Err(CalendarError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Parse `from`/`to` as YYYY-MM-DD.
    pub fn from_args(from: &str, to: &str) -> CalendarResult<Self> {
        DateRange::new(parse_date(from)?, parse_date(to)?)
    }

    pub fn start_param(&self) -> String {
        self.start.format(QUERY_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(QUERY_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}

pub fn parse_date(s: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(s, QUERY_DATE_FORMAT).map_err(|_| {
        CalendarError::Config(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

/// Calendar view layouts and the days each one shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Day,
    #[default]
    Week,
    Month,
}

/// Number of rows in the month grid.
const MONTH_GRID_WEEKS: i64 = 6;

impl ViewKind {
    /// Visible range of this view when it shows `date`.
    ///
    /// Weeks start on Sunday. The month view shows a fixed six-week grid
    /// starting on the Sunday on or before the first of the month.
    pub fn visible_range(&self, date: NaiveDate) -> CalendarResult<DateRange> {
        let (start, days) = match self {
            ViewKind::Day => (date, 1),
            ViewKind::Week => (week_start(date)?, 7),
            ViewKind::Month => (week_start(first_of_month(date))?, 7 * MONTH_GRID_WEEKS),
        };
        Ok(DateRange {
            start,
            end: add_days(start, days)?,
        })
    }

    /// Date shown after navigating `steps` pages forward (negative = back).
    pub fn shift(&self, date: NaiveDate, steps: i32) -> CalendarResult<NaiveDate> {
        match self {
            ViewKind::Day => add_days(date, i64::from(steps)),
            ViewKind::Week => add_days(date, 7 * i64::from(steps)),
            ViewKind::Month => {
                let first = first_of_month(date);
                let months = Months::new(steps.unsigned_abs());
                let shifted = if steps >= 0 {
                    first.checked_add_months(months)
                } else {
                    first.checked_sub_months(months)
                };
                shifted.ok_or_else(|| {
                    CalendarError::Config(format!("Cannot move {steps} months from {date}"))
                })
            }
        }
    }
}

impl FromStr for ViewKind {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(ViewKind::Day),
            "week" => Ok(ViewKind::Week),
            "month" => Ok(ViewKind::Month),
            other => Err(CalendarError::Config(format!(
                "Unknown view '{}'. Expected day, week or month",
                other
            ))),
        }
    }
}

fn week_start(date: NaiveDate) -> CalendarResult<NaiveDate> {
    add_days(date, -i64::from(date.weekday().num_days_from_sunday()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn add_days(date: NaiveDate, days: i64) -> CalendarResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| CalendarError::Config(format!("Date out of range: {days} days from {date}")))
}
