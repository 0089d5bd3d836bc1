use std::collections::BTreeSet;

use chrono::Month;
use derive_more::Constructor;
use itertools::Itertools;
use num_traits::FromPrimitive;
use serde::Deserialize;
use termion::color::{Bg, Cyan, Fg, Green, Red};
use termion::style;

use crate::date::CalendarDate;
use crate::store::EventStore;

pub const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub colors: bool,
    pub cursor_symbol: Option<char>,
    pub event_symbol: Option<char>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            colors: true,
            cursor_symbol: Some('*'),
            event_symbol: Some('+'),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Constructor)]
pub struct DayCell {
    pub day: u32,
    pub has_event: bool,
    pub is_cursor: bool,
}

impl DayCell {
    const CELL_WIDTH: usize = 4;

    fn render(&self, theme: &Theme) -> String {
        let mark = |on: bool, symbol: Option<char>| match symbol {
            Some(symbol) if on => symbol,
            _ => ' ',
        };
        let text = format!(
            "{}{:2}{}",
            mark(self.is_cursor, theme.cursor_symbol),
            self.day,
            mark(self.has_event, theme.event_symbol)
        );

        if !theme.colors || !(self.is_cursor || self.has_event) {
            return text;
        }

        let mut styled = String::new();
        if self.has_event {
            styled.push_str(&Fg(Green).to_string());
        }
        if self.is_cursor {
            styled.push_str(&Bg(Red).to_string());
        }
        styled.push_str(&text);
        styled.push_str(&style::Reset.to_string());
        styled
    }
}

/// The month around a cursor date, laid out in Monday-first weeks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<DayCell>; 7]>,
}

impl MonthGrid {
    pub fn new(cursor: CalendarDate, event_days: &BTreeSet<u32>) -> Self {
        let offset = cursor.first_of_month().weekday().num_days_from_monday() as usize;
        let days = cursor.days_in_month();

        let cells: Vec<Option<DayCell>> = (0..offset)
            .map(|_| None)
            .chain((1..=days).map(|day| {
                Some(DayCell::new(
                    day,
                    event_days.contains(&day),
                    day == cursor.day(),
                ))
            }))
            .collect();

        let weeks = cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week[..chunk.len()].copy_from_slice(chunk);
                week
            })
            .collect();

        MonthGrid {
            year: cursor.year(),
            month: cursor.month(),
            weeks,
        }
    }

    pub fn cell(&self, day: u32) -> Option<DayCell> {
        self.weeks
            .iter()
            .flat_map(|week| week.iter())
            .flatten()
            .find(|cell| cell.day == day)
            .copied()
    }

    pub fn month_name(&self) -> &'static str {
        Month::from_u32(self.month).map_or("", |m| m.name())
    }
}

pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Renderer { theme }
    }

    pub fn grid(&self, cursor: CalendarDate, store: &EventStore) -> MonthGrid {
        MonthGrid::new(cursor, &store.days_with_events(cursor.year(), cursor.month()))
    }

    pub fn render(&self, cursor: CalendarDate, store: &EventStore) -> String {
        self.render_grid(&self.grid(cursor, store))
    }

    pub fn render_grid(&self, grid: &MonthGrid) -> String {
        let header = format!("{} : {}", grid.month_name(), grid.year);
        let header = if self.theme.colors {
            format!("{}{}{}", Fg(Cyan), header, style::Reset)
        } else {
            header
        };

        let labels = WEEKDAYS
            .iter()
            .map(|label| format!(" {:<width$}", label, width = DayCell::CELL_WIDTH - 1))
            .join("");

        let rows = grid.weeks.iter().map(|week| {
            week.iter()
                .map(|cell| match cell {
                    Some(cell) => cell.render(&self.theme),
                    None => " ".repeat(DayCell::CELL_WIDTH),
                })
                .join("")
        });

        std::iter::once(header)
            .chain(std::iter::once(labels))
            .chain(rows)
            .join("\n")
    }
}
