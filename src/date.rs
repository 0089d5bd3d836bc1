use chrono::{Datelike, Local, NaiveDate, Weekday};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub fn days_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some(next.signed_duration_since(first).num_days() as u32)
}

/// A single, always valid, day of the Gregorian calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("{:04}/{:02}/{:02}", year, month, day),
                )
            })
    }

    pub fn today() -> Self {
        CalendarDate(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn first_of_month(&self) -> Self {
        CalendarDate(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn days_in_month(&self) -> u32 {
        // Every constructed date lies inside chrono's range, so does its month
        days_of_month(self.year(), self.month()).unwrap_or(31)
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.year() == year && self.month() == month
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

fn year(input: &str) -> IResult<&str, i32> {
    map_res(take_while_m_n(4, 4, |c: char| c.is_ascii_digit()), str::parse)(input)
}

fn field(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

fn date_fields(input: &str) -> IResult<&str, (i32, u32, u32)> {
    let (rest, (y, _, m, _, d)) = tuple((year, char('/'), field, char('/'), field))(input)?;
    Ok((rest, (y, m, d)))
}

/// Parses `yyyy/mm/dd` into a date.
///
/// Exactly three fields are accepted and the year must be four digits wide.
/// Field values that do not name a real day are reported as a format error as
/// well, callers fall back to asking for the fields one by one.
pub fn parse(text: &str) -> Result<CalendarDate> {
    let (_, (y, m, d)) = all_consuming(date_fields)(text)?;

    CalendarDate::from_ymd(y, m, d).map_err(|_| {
        Error::new(
            ErrorKind::DateParse,
            &format!("'{}' is not a calendar day", text),
        )
    })
}
