use std::fmt;
use std::io::{self, BufRead};

use rustyline::{self, error::ReadlineError, Config};

use crate::errors::Result;
use crate::util;

/// Line acquisition. Prompts and edits on a terminal; reads plain lines,
/// without a prompt, when stdin is a file or pipe.
pub struct Editor {
    internal: rustyline::Editor<()>,
    history_capacity: usize,
    is_terminal: bool,
}

impl Editor {
    pub fn with_capacity(history_capacity: usize) -> Editor {
        let config = Config::builder()
            .max_history_size(history_capacity)
            .history_ignore_space(true)
            .build();

        Editor {
            internal: rustyline::Editor::with_config(config),
            history_capacity,
            is_terminal: util::isatty(),
        }
    }

    /// Returns `None` at end of input.
    pub fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        if !self.is_terminal {
            return read_plain_line();
        }

        match self.internal.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            // ^C abandons the current line only
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Utf8Error) => {
                warn!("discarding line that is not valid UTF-8");
                eprintln!("sish: input is not valid UTF-8");
                Ok(Some(String::new()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn add_history_entry<S: AsRef<str>>(&mut self, line: S) {
        let line = line.as_ref();
        if self.is_terminal && self.history_capacity > 0 && !line.trim().is_empty() {
            self.internal.add_history_entry(line);
        }
    }
}

/// Reads one line of raw bytes. Invalid UTF-8 is replaced rather than
/// rejected, so a stray byte only affects the word it appears in.
fn read_plain_line() -> Result<Option<String>> {
    let stdin = io::stdin();
    let mut line = Vec::new();
    if stdin.lock().read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} history entries (capacity {}, terminal: {})",
            self.internal.history().len(),
            self.history_capacity,
            self.is_terminal
        )
    }
}
