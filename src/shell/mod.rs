//! Sish - Shell Module
//!
//! The Shell owns the job table and the line editor and runs the
//! "reap finished jobs, read a line, dispatch it" loop.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{self, ExitStatus};

use crate::core::command::Command;
use crate::core::process::FATAL_EXIT_STATUS;
use crate::editor::Editor;
use crate::errors::{Error, Result};
use crate::util::{self, SishExitStatusExt};

pub use self::job_table::{JobTable, DEFAULT_JOB_CAPACITY};

pub mod builtins;
pub mod job_table;
mod launcher;

const PROMPT: &str = ">> ";
const SYNTAX_ERROR_EXIT_STATUS: i32 = 2;

/// Sish Shell
pub struct Shell {
    /// Responsible for readline and history.
    editor: Editor,
    jobs: JobTable,
    /// Exit status of last command executed.
    last_exit_status: ExitStatus,
    config: ShellConfig,
    /// Is `false` if stdin is not a terminal.
    is_interactive: bool,
}

impl Shell {
    /// Constructs a new Shell with an empty job table.
    pub fn new(config: ShellConfig) -> Shell {
        let shell = Shell {
            editor: Editor::with_capacity(config.command_history_capacity),
            jobs: JobTable::with_capacity(config.job_capacity),
            last_exit_status: ExitStatus::from_success(),
            config,
            is_interactive: util::isatty(),
        };

        info!("sish started up");
        shell
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn jobs_mut(&mut self) -> &mut JobTable {
        &mut self.jobs
    }

    pub fn last_exit_status(&self) -> ExitStatus {
        self.last_exit_status
    }

    pub(crate) fn set_last_exit_status(&mut self, status: ExitStatus) {
        self.last_exit_status = status;
    }

    /// Reads the next line. Returns `None` when end of input is reached.
    pub fn prompt(&mut self) -> Result<Option<String>> {
        self.editor.readline(PROMPT)
    }

    /// Runs one input line. Only errors that leave the shell unusable (failed
    /// redirection, pipe or fork) are returned; everything else is reported
    /// and recorded in the exit status.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        let command = match Command::parse(input) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(e) => {
                self.report(&e, SYNTAX_ERROR_EXIT_STATUS);
                return Ok(());
            }
        };

        debug!("executing {:?}", command);
        match launcher::launch(self, &command) {
            Ok(()) => Ok(()),
            Err(ref e) if !e.is_fatal() => {
                self.report(e, 1);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Runs a sish script from a file, one line at a time.
    pub fn execute_commands_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.split(b'\n') {
            self.jobs.reap_finished();
            self.execute_command_string(&String::from_utf8_lossy(&line?))?;
        }

        Ok(())
    }

    /// Runs lines from stdin until end of input, then exits.
    pub fn execute_from_stdin(&mut self) -> ! {
        loop {
            let reaped = self.jobs.reap_finished();
            if !reaped.is_empty() {
                debug!("reaped {} finished jobs", reaped.len());
            }

            let input = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    error!("failed to read line: {}", e);
                    eprintln!("sish: {}", e);
                    self.exit(Some(ExitStatus::from_status(FATAL_EXIT_STATUS)));
                }
            };

            if self.config.enable_command_history {
                self.editor.add_history_entry(&input);
            }

            if let Err(e) = self.execute_command_string(&input) {
                error!("fatal: {}", e);
                eprintln!("sish: {}", e);
                self.exit(Some(ExitStatus::from_status(FATAL_EXIT_STATUS)));
            }
        }

        info!("end of input");
        self.exit(Some(ExitStatus::from_success()))
    }

    /// Exit the shell.
    ///
    /// Exit the shell with a status of n. If n is None, then the exit status is that of the last
    /// command executed. Codes are folded into `0..=255`, so `-1` exits with `255`.
    pub fn exit(&mut self, n: Option<ExitStatus>) -> ! {
        if self.config.display_messages && self.is_interactive {
            println!("exit");
        }

        let code = n
            .unwrap_or(self.last_exit_status)
            .code()
            .unwrap_or(FATAL_EXIT_STATUS);
        if !self.jobs.is_empty() {
            warn!("exiting with {} background jobs still running", self.jobs.len());
        }

        info!("sish has shut down");
        process::exit(util::code_like_u8(code));
    }

    fn report(&mut self, error: &Error, code: i32) {
        warn!("{}", error);
        eprintln!("sish: {}", error);
        self.last_exit_status = ExitStatus::from_status(code);
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\n{:?}", self.jobs, self.editor)
    }
}

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Determines if new command entries will be added to the shell's command history.
    enable_command_history: bool,

    /// Number of entries to store in the shell's command history
    command_history_capacity: usize,

    /// Determines if some messages (e.g. "exit") should be displayed.
    display_messages: bool,

    /// Number of background jobs tracked at once.
    job_capacity: usize,
}

impl ShellConfig {
    /// Creates an interactive shell, e.g. command history, messages
    ///
    /// # Complete List
    /// - Command History is enabled
    /// - Some additional messages are displayed when stdin is a terminal
    pub fn interactive(command_history_capacity: usize) -> ShellConfig {
        ShellConfig {
            enable_command_history: true,
            command_history_capacity,
            display_messages: true,
            ..Default::default()
        }
    }

    /// Creates a noninteractive shell, e.g. no command history
    ///
    /// # Complete List
    /// - Command History is disabled.
    /// - Fewer messages are displayed
    pub fn noninteractive() -> ShellConfig {
        Default::default()
    }

    /// Overrides how many background jobs may be tracked at once.
    pub fn with_job_capacity(self, job_capacity: usize) -> ShellConfig {
        ShellConfig {
            job_capacity,
            ..self
        }
    }
}

impl Default for ShellConfig {
    fn default() -> ShellConfig {
        ShellConfig {
            enable_command_history: false,
            command_history_capacity: 0,
            display_messages: false,
            job_capacity: DEFAULT_JOB_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ShellConfig::noninteractive();
        assert!(!config.enable_command_history);
        assert_eq!(config.job_capacity, DEFAULT_JOB_CAPACITY);

        let config = ShellConfig::interactive(10).with_job_capacity(3);
        assert!(config.enable_command_history);
        assert_eq!(config.command_history_capacity, 10);
        assert_eq!(config.job_capacity, 3);
    }

    #[test]
    fn test_syntax_error_sets_status() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        shell.execute_command_string("echo >").unwrap();
        assert_eq!(shell.last_exit_status().code(), Some(SYNTAX_ERROR_EXIT_STATUS));

        shell.execute_command_string("   ").unwrap();
        assert_eq!(shell.last_exit_status().code(), Some(SYNTAX_ERROR_EXIT_STATUS));
    }

    #[test]
    fn test_failed_redirection_is_fatal() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let err = shell
            .execute_command_string("cat < /no/such/dir/sish-input.txt")
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("sish-input.txt"));

        let err = shell
            .execute_command_string("echo hi > /no/such/dir/sish-output.txt")
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
