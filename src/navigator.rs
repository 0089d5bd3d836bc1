use chrono::{Duration, Months};
use serde::Deserialize;

use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Day,
    Month,
    Year,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// What a shift does when plain field arithmetic leaves the calendar,
/// e.g. moving from January 31st one month ahead.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Roll over into the neighbouring month or year and clamp the day to
    /// the length of the target month.
    Clamp,
    /// Refuse with `ErrorKind::InvalidDate`.
    Reject,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Clamp
    }
}

pub struct Navigator {
    cursor: CalendarDate,
    policy: OverflowPolicy,
}

impl Navigator {
    pub fn new(cursor: CalendarDate, policy: OverflowPolicy) -> Self {
        Navigator { cursor, policy }
    }

    pub fn cursor(&self) -> CalendarDate {
        self.cursor
    }

    pub fn jump_to(&mut self, date: CalendarDate) {
        log::debug!("Cursor jumps from {} to {}", self.cursor, date);
        self.cursor = date;
    }

    /// Moves the cursor by one `unit`. On error the cursor stays where it was.
    pub fn shift(&mut self, unit: Unit, direction: Direction) -> Result<CalendarDate> {
        let shifted = match self.policy {
            OverflowPolicy::Clamp => shift_clamped(self.cursor, unit, direction)?,
            OverflowPolicy::Reject => shift_fields(self.cursor, unit, direction.sign())?,
        };

        log::debug!("Cursor {:?} {:?}: {} -> {}", direction, unit, self.cursor, shifted);
        self.cursor = shifted;
        Ok(shifted)
    }
}

fn shift_clamped(date: CalendarDate, unit: Unit, direction: Direction) -> Result<CalendarDate> {
    let naive = date.as_naive();
    let shifted = match (unit, direction) {
        (Unit::Day, _) => naive.checked_add_signed(Duration::days(direction.sign() as i64)),
        (Unit::Month, Direction::Forward) => naive.checked_add_months(Months::new(1)),
        (Unit::Month, Direction::Backward) => naive.checked_sub_months(Months::new(1)),
        (Unit::Year, Direction::Forward) => naive.checked_add_months(Months::new(12)),
        (Unit::Year, Direction::Backward) => naive.checked_sub_months(Months::new(12)),
    };

    shifted.map(CalendarDate::from).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidDate,
            &format!("{} is at the edge of the supported range", date),
        )
    })
}

/// Adds `sign` to a single field without carrying into the others.
fn shift_fields(date: CalendarDate, unit: Unit, sign: i32) -> Result<CalendarDate> {
    let (mut year, mut month, mut day) = (date.year(), date.month() as i32, date.day() as i32);

    match unit {
        Unit::Day => day += sign,
        Unit::Month => month += sign,
        Unit::Year => year += sign,
    }

    if month < 1 || day < 1 {
        return Err(Error::new(
            ErrorKind::InvalidDate,
            &format!("{:04}/{:02}/{:02}", year, month, day),
        ));
    }

    CalendarDate::from_ymd(year, month as u32, day as u32)
}
