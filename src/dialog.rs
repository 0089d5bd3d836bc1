use crate::date::{self, days_of_month, CalendarDate};
use crate::error::{Error, ErrorKind, Result};
use crate::prompt::Prompter;

/// How a dialog ended. Anything but `Completed` sends the user back to the
/// main menu without running the rest of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Aborted,
    NotFound,
}

/// Unwraps a completed outcome, otherwise returns the outcome from the
/// enclosing function (which must return `Result<Outcome<_>>`).
#[macro_export]
macro_rules! proceed {
    ($outcome:expr) => {
        match $outcome {
            $crate::dialog::Outcome::Completed(value) => value,
            $crate::dialog::Outcome::Aborted => return Ok($crate::dialog::Outcome::Aborted),
            $crate::dialog::Outcome::NotFound => return Ok($crate::dialog::Outcome::NotFound),
        }
    };
}

pub const ABORT_HINT: &str = "Q to return to main menu";
const ABORT_KEY: char = 'Q';

fn is_abort(reply: &str) -> bool {
    reply
        .chars()
        .next()
        .map_or(false, |c| c.to_ascii_uppercase() == ABORT_KEY)
}

/// Keeps asking `question` until `accept` takes the reply. Empty replies are
/// asked again, the abort key or closed input aborts.
fn ask_field<P, T, F>(prompter: &mut P, question: &str, accept: F) -> Result<Outcome<T>>
where
    P: Prompter,
    F: Fn(&str) -> Option<T>,
{
    let message = format!("{}\n{}", ABORT_HINT, question);
    loop {
        let reply = match prompter.ask(&message)? {
            Some(reply) => reply,
            None => return Ok(Outcome::Aborted),
        };
        let reply = reply.trim();

        if is_abort(reply) {
            log::debug!("Dialog aborted by user");
            return Ok(Outcome::Aborted);
        }
        if let Some(value) = accept(reply) {
            return Ok(Outcome::Completed(value));
        }
        log::debug!("Rejected reply '{}' to '{}'", reply, question);
    }
}

fn leading_year(reply: &str) -> Option<i32> {
    reply.get(..4)?.parse().ok()
}

fn leading_number(reply: &str) -> Option<u32> {
    reply.get(..2).unwrap_or(reply).parse().ok()
}

/// Asks for year, month and day one after another until together they make
/// up a real date.
pub fn recover_date<P: Prompter>(
    prompter: &mut P,
    heading: Option<&str>,
) -> Result<Outcome<CalendarDate>> {
    if let Some(heading) = heading {
        prompter.say(&format!("{}\n", heading))?;
    }

    let year = proceed!(ask_field(
        prompter,
        "Which year? (In <yyyy> format please) : ",
        leading_year
    )?);
    let month = proceed!(ask_field(
        prompter,
        "What month? (as an int please) : ",
        |reply| leading_number(reply).filter(|m| (1..=12).contains(m))
    )?);
    let last_day = days_of_month(year, month).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidDate,
            &format!("{:04}/{:02} is out of range", year, month),
        )
    })?;
    let day = proceed!(ask_field(prompter, "What day? : ", |reply| {
        leading_number(reply).filter(|d| (1..=last_day).contains(d))
    })?);

    CalendarDate::from_ymd(year, month, day).map(Outcome::Completed)
}

/// Parses `text` as `yyyy/mm/dd`; missing or malformed text falls back to
/// [`recover_date`].
pub fn parse_or_recover<P: Prompter>(
    prompter: &mut P,
    text: Option<&str>,
) -> Result<Outcome<CalendarDate>> {
    match text.map(date::parse) {
        Some(Ok(date)) => Ok(Outcome::Completed(date)),
        Some(Err(e)) => {
            log::info!("{}, asking for the date instead", e);
            recover_date(prompter, None)
        }
        None => recover_date(prompter, None),
    }
}

/// Asks for a non-empty line of free text. Only closed input aborts.
pub fn ask_text<P: Prompter>(prompter: &mut P, question: &str) -> Result<Outcome<String>> {
    loop {
        match prompter.ask(question)? {
            Some(reply) if !reply.trim().is_empty() => {
                return Ok(Outcome::Completed(reply.trim().to_owned()))
            }
            Some(_) => continue,
            None => return Ok(Outcome::Aborted),
        }
    }
}
