use std::process::ExitStatus;

use crate::shell::builtins::{self, prelude::*};
use crate::util::SishExitStatusExt;

const NUMERIC_ARGUMENT_REQUIRED_EXIT_STATUS: i32 = 2;

pub struct Exit;

impl builtins::BuiltinCommand for Exit {
    const NAME: &'static str = builtins::EXIT_NAME;

    const HELP: &'static str = "\
exit: exit [n]
    Exit the shell with a status of N. If N is omitted, the exit status
    is 0. Background jobs are left running.";

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        let status_code = args
            .first()
            .map(|arg| {
                arg.as_ref().parse::<i32>().unwrap_or_else(|_| {
                    eprintln!("sish: exit: {}: numeric argument required", arg.as_ref());
                    NUMERIC_ARGUMENT_REQUIRED_EXIT_STATUS
                })
            })
            .unwrap_or(0);
        shell.exit(Some(ExitStatus::from_status(status_code)));
    }
}
