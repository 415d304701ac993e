use std::fmt;
use std::str::FromStr;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::{Error, Result};

const MONTH_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]");
const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A calendar month, the granularity at which statistics snapshots are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u8,
}

impl Month {
    pub fn new(year: i32, month: u8) -> Result<Self> {
        let cal = time::Month::try_from(month).map_err(|_| Error::InvalidMonth(format!("{year}-{month}")))?;
        Date::from_calendar_date(year, cal, 1).map_err(|_| Error::InvalidMonth(format!("{year}-{month}")))?;
        Ok(Self { year, month })
    }

    pub fn containing(date: Date) -> Self {
        Self { year: date.year(), month: date.month() as u8 }
    }

    /// The current month in UTC.
    pub fn current() -> Self {
        Self::containing(OffsetDateTime::now_utc().date())
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u8 { self.month }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// This month followed by up to `limit - 1` earlier months, newest first.
    pub fn walk_back(self, limit: usize) -> Months {
        Months { next: self, remaining: limit }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cal = time::Month::try_from(self.month).map_err(|_| fmt::Error)?;
        let date = Date::from_calendar_date(self.year, cal, 1).map_err(|_| fmt::Error)?;
        let text = date.format(MONTH_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let date = Date::parse(&format!("{s}-01"), DAY_FORMAT).map_err(|_| Error::InvalidMonth(s.to_string()))?;
        Ok(Self::containing(date))
    }
}

/// Bounded backward walk over months.
#[derive(Debug, Clone)]
pub struct Months {
    next: Month,
    remaining: usize,
}

impl Iterator for Months {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = current.previous();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Months {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats() {
        let m: Month = "2017-05".parse().unwrap();
        assert_eq!(m, Month::new(2017, 5).unwrap());
        assert_eq!(m.to_string(), "2017-05");
        assert!("2017-13".parse::<Month>().is_err());
        assert!("latest".parse::<Month>().is_err());
    }

    #[test]
    fn walk_crosses_year_boundary() {
        let start = Month::new(2018, 2).unwrap();
        let months: Vec<String> = start.walk_back(4).map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2018-02", "2018-01", "2017-12", "2017-11"]);
    }

    #[test]
    fn walk_is_bounded() {
        let start = Month::new(2018, 2).unwrap();
        assert_eq!(start.walk_back(0).count(), 0);
        assert_eq!(start.walk_back(30).len(), 30);
    }
}
