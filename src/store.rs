use std::collections::{BTreeSet, HashMap};

use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

/// Named single-day events of the running session, keyed by name.
#[derive(Debug, Default)]
pub struct EventStore {
    events: HashMap<String, CalendarDate>,
}

impl EventStore {
    pub fn new() -> Self {
        EventStore::default()
    }

    /// Inserts or overwrites the event. Returns the date it replaced, if any.
    pub fn create(&mut self, name: impl Into<String>, date: CalendarDate) -> Option<CalendarDate> {
        let name = name.into();
        log::debug!("Storing event '{}' on {}", name, date);
        self.events.insert(name, date)
    }

    pub fn get(&self, name: &str) -> Result<CalendarDate> {
        self.events
            .get(name)
            .copied()
            .ok_or_else(|| Error::new(ErrorKind::EventNotFound, name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Moves the date of `old` over to `new`. Any event already called `new`
    /// is replaced. Returns `false` if there is no event called `old`.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.events.remove(old) {
            Some(date) => {
                let new = new.into();
                log::debug!("Renaming event '{}' to '{}'", old, new);
                self.events.insert(new, date);
                true
            }
            None => {
                log::warn!("Cannot rename unknown event '{}'", old);
                false
            }
        }
    }

    pub fn reschedule(&mut self, name: &str, date: CalendarDate) -> Result<()> {
        match self.events.get_mut(name) {
            Some(current) => {
                log::debug!("Moving event '{}' from {} to {}", name, current, date);
                *current = date;
                Ok(())
            }
            None => Err(Error::new(ErrorKind::EventNotFound, name)),
        }
    }

    /// `name : YYYY / MM / DD`
    pub fn format(&self, name: &str) -> Result<String> {
        let date = self.get(name)?;
        Ok(format!(
            "{} : {} / {:02} / {:02}",
            name,
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// Days of the given month that carry at least one event.
    pub fn days_with_events(&self, year: i32, month: u32) -> BTreeSet<u32> {
        self.events
            .values()
            .filter(|date| date.in_month(year, month))
            .map(|date| date.day())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
