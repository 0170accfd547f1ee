//! Sish builtins
//!
//! This module includes the implementations of the shell builtin commands.
//! They run inside the shell's own process and write to the `stdout` they
//! are handed, which the launcher points at any requested redirection.

use std::process::ExitStatus;

use self::prelude::*;
use crate::util::SishExitStatusExt;

use self::dirs::{Cd, Pwd};
use self::echo::Echo;
use self::exit::Exit;
use self::help::Help;
use self::jobs::{Fg, Jobs};

pub mod prelude {
    pub use std::io::Write;

    pub use super::BuiltinCommand;
    pub use crate::errors::{Error, ErrorKind, Result};
    pub use crate::shell::Shell;
}

mod dirs;
mod echo;
mod exit;
mod help;
mod jobs;

const CD_NAME: &str = "cd";
const ECHO_NAME: &str = "echo";
const EXIT_NAME: &str = "exit";
const FG_NAME: &str = "fg";
const HELP_NAME: &str = "help";
const JOBS_NAME: &str = "jobs";
const PWD_NAME: &str = "pwd";

/// Represents a Sish builtin command such as cd or help.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// The help string to display to the user.
    const HELP: &'static str;
    /// The usage string to display to the user.
    fn usage() -> &'static str {
        Self::HELP.lines().next().unwrap_or(Self::NAME)
    }
    /// Runs the command with the given arguments in the `shell` environment.
    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()>;
}

pub fn is_builtin<T: AsRef<str>>(program: T) -> bool {
    [
        CD_NAME, ECHO_NAME, EXIT_NAME, FG_NAME, HELP_NAME, JOBS_NAME, PWD_NAME,
    ]
    .contains(&program.as_ref())
}

/// precondition: command is a builtin.
/// Returns (`exit_status_code`, `builtin_result`)
pub fn run<S1, S2>(
    shell: &mut Shell,
    program: S1,
    args: &[S2],
    stdout: &mut dyn Write,
) -> (ExitStatus, Result<()>)
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    debug_assert!(is_builtin(&program));

    let result = match program.as_ref() {
        CD_NAME => Cd::run(shell, args, stdout),
        ECHO_NAME => Echo::run(shell, args, stdout),
        EXIT_NAME => Exit::run(shell, args, stdout),
        FG_NAME => Fg::run(shell, args, stdout),
        HELP_NAME => Help::run(shell, args, stdout),
        JOBS_NAME => Jobs::run(shell, args, stdout),
        PWD_NAME => Pwd::run(shell, args, stdout),
        _ => unreachable!(),
    };

    let exit_status = get_builtin_exit_status(&result);
    (exit_status, result)
}

fn get_builtin_exit_status(result: &Result<()>) -> ExitStatus {
    let status = if let Err(ref e) = *result {
        match *e.kind() {
            ErrorKind::BuiltinCommand(_, code) => code,
            _ => 1,
        }
    } else {
        0
    };

    ExitStatus::from_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ShellConfig;
    use std::io;

    #[test]
    fn test_is_builtin() {
        for name in &["cd", "echo", "exit", "fg", "help", "jobs", "pwd"] {
            assert!(is_builtin(name), "{} should be a builtin", name);
        }
        assert!(!is_builtin("ls"));
        assert!(!is_builtin(""));
    }

    #[test]
    fn test_run_reports_status() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let mut stdout = Vec::new();

        let (status, result) = run(&mut shell, "echo", &["a", "b"], &mut stdout);
        assert!(result.is_ok());
        assert!(status.success());
        assert_eq!(String::from_utf8(stdout).unwrap(), "a b\n");

        let (status, result) = run(&mut shell, "fg", &["1"], &mut io::sink());
        assert!(result.is_err());
        assert_eq!(status.code(), Some(1));
    }
}
