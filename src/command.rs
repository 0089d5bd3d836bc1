use nom::{
    bytes::complete::{is_not, take_till},
    character::complete::char,
    combinator::all_consuming,
    sequence::separated_pair,
    IResult,
};

use crate::navigator::{Direction, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Quit,
    Help,
    Jump,
    Forward,
    Backward,
    New,
    Modify,
    Read,
}

impl Cmd {
    pub fn from_symbol(symbol: char) -> Option<Cmd> {
        match symbol.to_ascii_uppercase() {
            'Q' => Some(Cmd::Quit),
            'H' => Some(Cmd::Help),
            'S' => Some(Cmd::Jump),
            'F' => Some(Cmd::Forward),
            'B' => Some(Cmd::Backward),
            'N' => Some(Cmd::New),
            'C' => Some(Cmd::Modify),
            'R' => Some(Cmd::Read),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Cmd::Quit => 'Q',
            Cmd::Help => 'H',
            Cmd::Jump => 'S',
            Cmd::Forward => 'F',
            Cmd::Backward => 'B',
            Cmd::New => 'N',
            Cmd::Modify => 'C',
            Cmd::Read => 'R',
        }
    }

    pub fn is_scroll(&self) -> bool {
        matches!(self, Cmd::Jump | Cmd::Forward | Cmd::Backward)
    }

    pub fn is_event(&self) -> bool {
        matches!(self, Cmd::New | Cmd::Modify | Cmd::Read)
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Cmd::Forward => Some(Direction::Forward),
            Cmd::Backward => Some(Direction::Backward),
            _ => None,
        }
    }
}

/// One line typed at the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    /// `symbol` is the command letter as typed, `arg` everything after it.
    Command {
        cmd: Cmd,
        symbol: char,
        arg: String,
    },
    Invalid(char),
}

/// Drops all whitespace from `line` and splits it into the command symbol and
/// whatever follows it.
pub fn tokenize(line: &str) -> Input {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let mut chars = compact.chars();

    match chars.next() {
        None => Input::Empty,
        Some(symbol) => match Cmd::from_symbol(symbol) {
            Some(cmd) => Input::Command {
                cmd,
                symbol,
                arg: chars.as_str().to_owned(),
            },
            None => Input::Invalid(symbol.to_ascii_uppercase()),
        },
    }
}

/// Unit indicator of the scroll commands, months unless told otherwise.
pub fn scroll_unit(arg: &str) -> Unit {
    match arg.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('D') => Unit::Day,
        Some('Y') => Unit::Year,
        _ => Unit::Month,
    }
}

fn name_and_date(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(is_not("-"), char('-'), take_till(|c: char| c == '-'))(input)
}

/// Splits `<name>-<date>`. The name may not be empty and there must be
/// exactly one separator.
pub fn split_event_arg(arg: &str) -> Option<(&str, &str)> {
    all_consuming(name_and_date)(arg)
        .ok()
        .map(|(_, parts)| parts)
}
