use std::io::{self, BufRead, Write};

/// The only way the interpreter talks to the user.
pub trait Prompter {
    /// Shows `message` and blocks until a line was entered. The trailing line
    /// break is removed. Returns `None` once the input is closed.
    fn ask(&mut self, message: &str) -> io::Result<Option<String>>;

    fn say(&mut self, message: &str) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Console {
            input,
            output,
            clear_screen,
        }
    }
}

impl<R: BufRead, W: Write> Prompter for Console<R, W> {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(len);
        Ok(Some(line))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            write!(
                self.output,
                "{}{}",
                termion::clear::All,
                termion::cursor::Goto(1, 1)
            )?;
        }
        Ok(())
    }
}

/// Replays canned replies and records everything shown to the user.
#[cfg(test)]
pub(crate) struct Script {
    replies: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
}

#[cfg(test)]
impl Script {
    pub fn new(replies: &[&str]) -> Self {
        Script {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }

    pub fn shown(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

#[cfg(test)]
impl Prompter for Script {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        self.transcript.push(message.to_owned());
        Ok(self.replies.pop_front())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(message.to_owned());
        Ok(())
    }
}
