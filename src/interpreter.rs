use crate::command::{scroll_unit, split_event_arg, tokenize, Cmd, Input};
use crate::date::CalendarDate;
use crate::dialog::{ask_text, parse_or_recover, recover_date, Outcome};
use crate::error::Result;
use crate::navigator::{Navigator, OverflowPolicy};
use crate::prompt::Prompter;
use crate::render::Renderer;
use crate::store::EventStore;

pub const MENU_PROMPT: &str =
    "Welcome to the calendar, what would you like to do? \n(Q to quit, H for help) : ";

pub const HELP: &str = "
Here's how to use the calendar!
To scroll to the next day enter         : FD
To scroll to the previous day enter     : BD
To scroll to the next month enter       : FM
To scroll to the previous month enter   : BM
To scroll to the next year enter        : FY
To scroll to the previous year enter    : BY
To scroll to a date enter               : S<date in yyyy/mm/dd format>
To create an event enter                : N<event name>-<date in yyyy/mm/dd format>
To modify an event enter                : C<event name>-<date in yyyy/mm/dd format>
To read an event enter                  : R<event name>-<date in yyyy/mm/dd format>
(To continue Press enter)
";

const NOT_FOUND: &str = "The event you described does not exist. Back to main menu ";

/// Everything a session changes: the cursor and the events.
pub struct Session {
    pub navigator: Navigator,
    pub store: EventStore,
}

impl Session {
    pub fn new(cursor: CalendarDate, policy: OverflowPolicy) -> Self {
        Session {
            navigator: Navigator::new(cursor, policy),
            store: EventStore::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    MainMenu,
    AwaitingEventDialog {
        cmd: Cmd,
        symbol: char,
        arg: String,
    },
    AwaitingModifyChoice { name: String },
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModifyChoice {
    Quit,
    Date,
    Name,
}

impl ModifyChoice {
    fn from_reply(reply: &str) -> Option<Self> {
        match reply.trim().chars().next()?.to_ascii_uppercase() {
            'Q' => Some(ModifyChoice::Quit),
            'D' => Some(ModifyChoice::Date),
            'N' => Some(ModifyChoice::Name),
            _ => None,
        }
    }
}

fn settle(outcome: Outcome<State>) -> State {
    match outcome {
        Outcome::Completed(state) => state,
        Outcome::Aborted | Outcome::NotFound => State::MainMenu,
    }
}

pub struct Interpreter<'a, P: Prompter> {
    session: &'a mut Session,
    renderer: &'a Renderer,
    prompter: P,
}

impl<'a, P: Prompter> Interpreter<'a, P> {
    pub fn new(session: &'a mut Session, renderer: &'a Renderer, prompter: P) -> Self {
        Interpreter {
            session,
            renderer,
            prompter,
        }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Runs until the user quits or the input is closed.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::MainMenu;
        while state != State::Terminated {
            state = self.advance(state)?;
        }

        log::info!(
            "Session ended with {} event(s) stored",
            self.session.store.len()
        );
        Ok(())
    }

    pub fn advance(&mut self, state: State) -> Result<State> {
        let next = match state {
            State::MainMenu => self.main_menu()?,
            State::AwaitingEventDialog { cmd, symbol, arg } => {
                settle(self.event_dialog(cmd, symbol, &arg)?)
            }
            State::AwaitingModifyChoice { name } => settle(self.modify_dialog(&name)?),
            State::Terminated => State::Terminated,
        };

        log::debug!("Next state: {:?}", next);
        Ok(next)
    }

    fn main_menu(&mut self) -> Result<State> {
        let calendar = self
            .renderer
            .render(self.session.navigator.cursor(), &self.session.store);
        self.prompter.clear()?;
        self.prompter.say(&calendar)?;

        let line = match self.prompter.ask(MENU_PROMPT)? {
            Some(line) => line,
            None => {
                log::info!("Input closed, leaving");
                return Ok(State::Terminated);
            }
        };

        match tokenize(&line) {
            Input::Empty => Ok(State::MainMenu),
            Input::Invalid(symbol) => {
                log::debug!("Unknown command '{}'", symbol);
                self.acknowledge(&format!(
                    "{} is not a valid command, please input a valid command\n{}",
                    symbol, HELP
                ))?;
                Ok(State::MainMenu)
            }
            Input::Command { cmd: Cmd::Quit, .. } => Ok(State::Terminated),
            Input::Command { cmd: Cmd::Help, .. } => {
                self.acknowledge(HELP)?;
                Ok(State::MainMenu)
            }
            Input::Command { cmd, arg, .. } if cmd.is_scroll() => {
                log::debug!("Scroll command {:?} '{}'", cmd, arg);
                self.scroll(cmd, &arg)?;
                Ok(State::MainMenu)
            }
            Input::Command { cmd, symbol, arg } => {
                Ok(State::AwaitingEventDialog { cmd, symbol, arg })
            }
        }
    }

    fn scroll(&mut self, cmd: Cmd, arg: &str) -> Result<()> {
        match cmd.direction() {
            Some(direction) => {
                self.session.navigator.shift(scroll_unit(arg), direction)?;
            }
            None => {
                if let Outcome::Completed(date) = parse_or_recover(&mut self.prompter, Some(arg))? {
                    self.session.navigator.jump_to(date);
                }
            }
        }
        Ok(())
    }

    fn event_dialog(&mut self, cmd: Cmd, symbol: char, arg: &str) -> Result<Outcome<State>> {
        let (name, date) = if arg.is_empty() {
            let name = proceed!(ask_text(
                &mut self.prompter,
                "Give us a name for the event : "
            )?);
            let date = proceed!(recover_date(
                &mut self.prompter,
                Some("Lets get a date for the event")
            )?);
            (name, date)
        } else if let Some((name, text)) = split_event_arg(arg) {
            let date = proceed!(parse_or_recover(&mut self.prompter, Some(text))?);
            (name.to_owned(), date)
        } else {
            // The whole token, command letter included, becomes the name
            log::info!("Could not split '{}' into name and date", arg);
            let date = proceed!(recover_date(
                &mut self.prompter,
                Some("Date could not be parsed, lets get a new one")
            )?);
            (format!("{}{}", symbol, arg), date)
        };

        match cmd {
            Cmd::New => {
                self.session.store.create(name.as_str(), date);
                let summary = self.session.store.format(&name)?;
                self.acknowledge(&format!("new event created {}", summary))?;
                Ok(Outcome::Completed(State::MainMenu))
            }
            Cmd::Modify | Cmd::Read if !self.session.store.contains(&name) => {
                log::info!("No event called '{}'", name);
                self.acknowledge(NOT_FOUND)?;
                Ok(Outcome::NotFound)
            }
            Cmd::Modify => Ok(Outcome::Completed(State::AwaitingModifyChoice { name })),
            Cmd::Read => {
                let summary = self.session.store.format(&name)?;
                self.acknowledge(&summary)?;
                Ok(Outcome::Completed(State::MainMenu))
            }
            _ => Ok(Outcome::Completed(State::MainMenu)),
        }
    }

    fn modify_dialog(&mut self, name: &str) -> Result<Outcome<State>> {
        let summary = match self.session.store.format(name) {
            Ok(summary) => summary,
            Err(e) if e.is_not_found() => return Ok(Outcome::NotFound),
            Err(e) => return Err(e),
        };
        let question = format!(
            "\nLet's modify the event below.\n{}\n\
             To return to the main menu enter Q,\n\
             To change date enter D,\n\
             To change name enter N,\n\
             What would you like to do?:\n",
            summary
        );

        let choice = loop {
            let reply = match self.prompter.ask(&question)? {
                Some(reply) => reply,
                None => return Ok(Outcome::Aborted),
            };
            if let Some(choice) = ModifyChoice::from_reply(&reply) {
                break choice;
            }
            if !reply.trim().is_empty() {
                self.prompter.say("Invalid command, try again.")?;
            }
        };

        match choice {
            ModifyChoice::Quit => return Ok(Outcome::Aborted),
            ModifyChoice::Date => {
                let date = proceed!(recover_date(&mut self.prompter, Some("Lets get the new date"))?);
                self.session.store.reschedule(name, date)?;
            }
            ModifyChoice::Name => {
                let new_name = proceed!(ask_text(
                    &mut self.prompter,
                    "What is the event's new name? "
                )?);
                self.session.store.rename(name, new_name);
            }
        }

        Ok(Outcome::Completed(State::MainMenu))
    }

    /// Shows `message` and waits for the user to press enter.
    fn acknowledge(&mut self, message: &str) -> Result<()> {
        self.prompter.ask(message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::prompt::Script;
    use crate::render::Theme;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn session() -> Session {
        Session::new(date(2024, 2, 15), OverflowPolicy::Clamp)
    }

    fn with_dentist() -> Session {
        let mut session = session();
        session.store.create("Dentist", date(2024, 2, 20));
        session
    }

    fn renderer() -> Renderer {
        Renderer::new(Theme {
            colors: false,
            ..Theme::default()
        })
    }

    fn run_script(session: &mut Session, replies: &[&str]) -> Script {
        let renderer = renderer();
        let mut interpreter = Interpreter::new(session, &renderer, Script::new(replies));
        interpreter.run().unwrap();
        interpreter.into_prompter()
    }

    #[test]
    fn new_event_is_stored_and_rendered() {
        let mut session = session();
        let script = run_script(&mut session, &["N Dentist-2024/02/20", ""]);

        assert_eq!(session.store.get("Dentist").unwrap(), date(2024, 2, 20));
        assert!(script.shown("new event created Dentist : 2024 / 02 / 20"));

        let grid = renderer().grid(session.navigator.cursor(), &session.store);
        let dentist = grid.cell(20).unwrap();
        let cursor = grid.cell(15).unwrap();
        assert!(dentist.has_event && !dentist.is_cursor);
        assert!(cursor.is_cursor && !cursor.has_event);
        assert!(script.shown(" 19  20+ 21 "));
    }

    #[test]
    fn new_event_overwrites_same_name() {
        let mut session = with_dentist();
        run_script(&mut session, &["ndentist-2024/02/01", "", "NDentist-2024/02/21", ""]);

        assert_eq!(session.store.get("Dentist").unwrap(), date(2024, 2, 21));
        assert_eq!(session.store.get("dentist").unwrap(), date(2024, 2, 1));
    }

    #[test]
    fn new_event_without_argument_asks_for_everything() {
        let mut session = session();
        let script = run_script(
            &mut session,
            &["N", "  ", "Team lunch", "2024", "2", "22", ""],
        );

        assert_eq!(session.store.get("Team lunch").unwrap(), date(2024, 2, 22));
        assert!(script.shown("Lets get a date for the event"));
    }

    #[test]
    fn unsplittable_argument_becomes_the_name() {
        let mut session = session();
        let script = run_script(&mut session, &["NCheck-up-2024/02/20", "2024", "2", "21", ""]);

        assert!(script.shown("Date could not be parsed"));
        assert_eq!(
            session.store.get("NCheck-up-2024/02/20").unwrap(),
            date(2024, 2, 21)
        );
        assert!(!session.store.contains("Check-up-2024/02/20"));
        assert!(!session.store.contains("Check"));
    }

    #[test]
    fn argument_without_separator_keeps_typed_letter_in_name() {
        let mut typed = session();
        run_script(&mut typed, &["NDentist", "2024", "2", "20", ""]);
        assert_eq!(typed.store.get("NDentist").unwrap(), date(2024, 2, 20));
        assert!(!typed.store.contains("Dentist"));

        let mut lowercase = session();
        run_script(&mut lowercase, &["n dentist", "2024", "2", "20", ""]);
        assert_eq!(lowercase.store.get("ndentist").unwrap(), date(2024, 2, 20));

        let mut existing = with_dentist();
        let script = run_script(&mut existing, &["RDentist", "2024", "2", "20", ""]);
        assert!(script.shown(NOT_FOUND));
    }

    #[test]
    fn bad_date_in_argument_is_recovered() {
        let mut session = session();
        run_script(&mut session, &["NDentist-2024/02/30", "2024", "2", "28", ""]);
        assert_eq!(session.store.get("Dentist").unwrap(), date(2024, 2, 28));
    }

    #[test]
    fn abort_during_new_event_discards_it() {
        let mut session = session();
        let script = run_script(&mut session, &["NDentist-2024/13/01", "2024", "q", "FD"]);

        assert!(session.store.is_empty());
        assert_eq!(session.navigator.cursor(), date(2024, 2, 16));
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn scroll_backward_by_year() {
        let mut session = session();
        run_script(&mut session, &["BY"]);
        assert_eq!(session.navigator.cursor(), date(2023, 2, 15));
    }

    #[test]
    fn scroll_defaults_to_month() {
        let mut session = session();
        run_script(&mut session, &["f"]);
        assert_eq!(session.navigator.cursor(), date(2024, 3, 15));

        run_script(&mut session, &["b d", "bx"]);
        assert_eq!(session.navigator.cursor(), date(2024, 2, 14));
    }

    #[test]
    fn jump_to_typed_date() {
        let mut session = session();
        run_script(&mut session, &["S 2024/12/25"]);
        assert_eq!(session.navigator.cursor(), date(2024, 12, 25));
    }

    #[test]
    fn jump_with_malformed_date_asks_again() {
        let mut session = session();
        let script = run_script(&mut session, &["S2024/12", "2025", "1", "5"]);

        assert_eq!(session.navigator.cursor(), date(2025, 1, 5));
        assert!(script.shown("Which year?"));
    }

    #[test]
    fn aborted_jump_keeps_cursor() {
        let mut session = session();
        run_script(&mut session, &["S", "2025", "q", "FD"]);
        assert_eq!(session.navigator.cursor(), date(2024, 2, 16));
    }

    #[test]
    fn modify_renames_event() {
        let mut session = with_dentist();
        let script = run_script(&mut session, &["C Dentist-2024/02/20", "N", "Doctor"]);

        assert!(script.shown("Let's modify the event below.\nDentist : 2024 / 02 / 20"));
        assert_eq!(session.store.get("Doctor").unwrap(), date(2024, 2, 20));
        assert!(session.store.get("Dentist").unwrap_err().is_not_found());
    }

    #[test]
    fn modify_without_argument_prompts_for_name_and_date() {
        let mut session = with_dentist();
        run_script(
            &mut session,
            &["C", "Dentist", "2024", "2", "20", "n", "Doctor"],
        );

        assert_eq!(session.store.get("Doctor").unwrap(), date(2024, 2, 20));
        assert!(!session.store.contains("Dentist"));
    }

    #[test]
    fn modify_reschedules_event() {
        let mut session = with_dentist();
        let script = run_script(
            &mut session,
            &["CDentist-2024/02/20", "x", "", "d", "2024", "3", "1"],
        );

        assert!(script.shown("Invalid command, try again."));
        assert!(script.shown("Lets get the new date"));
        assert_eq!(session.store.get("Dentist").unwrap(), date(2024, 3, 1));
    }

    #[test]
    fn modify_quit_returns_to_menu_untouched() {
        let mut session = with_dentist();
        run_script(&mut session, &["CDentist-2024/02/20", "q", "FD"]);

        assert_eq!(session.store.get("Dentist").unwrap(), date(2024, 2, 20));
        assert_eq!(session.navigator.cursor(), date(2024, 2, 16));
    }

    #[test]
    fn read_shows_event() {
        let mut session = with_dentist();
        let script = run_script(&mut session, &["r Dentist-2024/02/20", ""]);
        assert!(script
            .transcript
            .iter()
            .any(|line| line == "Dentist : 2024 / 02 / 20"));
    }

    #[test]
    fn missing_event_goes_back_to_menu() {
        for cmd in &["RGym-2024/02/20", "CGym-2024/02/20"] {
            let mut session = with_dentist();
            let script = run_script(&mut session, &[*cmd, "", "FD"]);

            assert!(script.shown(NOT_FOUND));
            assert!(!script.shown("Let's modify"));
            assert_eq!(session.navigator.cursor(), date(2024, 2, 16));
            assert_eq!(session.store.len(), 1);
        }
    }

    #[test]
    fn state_transitions() {
        let mut session = with_dentist();
        let renderer = renderer();
        let mut interpreter = Interpreter::new(&mut session, &renderer, Script::new(&["q"]));

        let next = interpreter
            .advance(State::AwaitingModifyChoice {
                name: "Gym".to_owned(),
            })
            .unwrap();
        assert_eq!(next, State::MainMenu);
        assert_eq!(interpreter.prompter().remaining(), 1);

        let next = interpreter
            .advance(State::AwaitingEventDialog {
                cmd: Cmd::Modify,
                symbol: 'C',
                arg: "Dentist-2024/02/20".to_owned(),
            })
            .unwrap();
        assert_eq!(
            next,
            State::AwaitingModifyChoice {
                name: "Dentist".to_owned()
            }
        );

        let next = interpreter.advance(next).unwrap();
        assert_eq!(next, State::MainMenu);
        assert_eq!(interpreter.advance(State::Terminated).unwrap(), State::Terminated);
    }

    #[test]
    fn help_and_invalid_commands_wait_for_enter() {
        let mut session = session();
        let script = run_script(&mut session, &["h", "", "x", ""]);

        assert!(script.shown("Here's how to use the calendar!"));
        assert!(script.shown("X is not a valid command"));
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn blank_lines_redraw_the_menu() {
        let mut session = session();
        let script = run_script(&mut session, &["", "   ", "q", "FD"]);

        let menus = script
            .transcript
            .iter()
            .filter(|line| line.as_str() == MENU_PROMPT)
            .count();
        assert_eq!(menus, 3);
        assert_eq!(script.remaining(), 1);
        assert_eq!(session.navigator.cursor(), date(2024, 2, 15));
    }

    #[test]
    fn reject_policy_makes_impossible_scroll_fatal() {
        let mut session = Session::new(date(2024, 1, 31), OverflowPolicy::Reject);
        let renderer = renderer();
        let mut interpreter =
            Interpreter::new(&mut session, &renderer, Script::new(&["FM", "q"]));

        let err = interpreter.run().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidDate));
        assert_eq!(interpreter.prompter().remaining(), 1);
        drop(interpreter);
        assert_eq!(session.navigator.cursor(), date(2024, 1, 31));
    }

    #[test]
    fn clamp_policy_keeps_scrolling() {
        let mut session = Session::new(date(2024, 1, 31), OverflowPolicy::Clamp);
        run_script(&mut session, &["FM", "FM"]);
        assert_eq!(session.navigator.cursor(), date(2024, 3, 29));
    }
}
