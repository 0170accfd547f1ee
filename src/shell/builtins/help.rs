use crate::shell::builtins::{self, prelude::*};
use crate::shell::builtins::{Cd, Echo, Exit, Fg, Jobs, Pwd};

pub struct Help;

impl BuiltinCommand for Help {
    const NAME: &'static str = builtins::HELP_NAME;

    const HELP: &'static str = "\
help: help [command ...]
    Display helpful information about builtin commands. If COMMAND is specified,
    gives detailed help on all commands matching COMMAND, otherwise a list of the
    builtins is printed.";

    fn run<T: AsRef<str>>(_shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        if args.is_empty() {
            for usage in &all_usage_strings() {
                writeln!(stdout, "{}", usage)?;
            }
            return Ok(());
        }

        let mut all_invalid = true;
        for arg in args {
            if let Some(msg) = help_for(arg.as_ref()) {
                writeln!(stdout, "{}", msg)?;
                all_invalid = false;
            }
        }
        if all_invalid {
            let topic = args.last().map_or("", |arg| arg.as_ref());
            return Err(Error::builtin_command(
                format!("help: no help topics match {}", topic),
                1,
            ));
        }

        Ok(())
    }
}

fn help_for(name: &str) -> Option<&'static str> {
    match name {
        builtins::CD_NAME => Some(Cd::HELP),
        builtins::ECHO_NAME => Some(Echo::HELP),
        builtins::EXIT_NAME => Some(Exit::HELP),
        builtins::FG_NAME => Some(Fg::HELP),
        builtins::HELP_NAME => Some(Help::HELP),
        builtins::JOBS_NAME => Some(Jobs::HELP),
        builtins::PWD_NAME => Some(Pwd::HELP),
        _ => None,
    }
}

fn all_usage_strings() -> [&'static str; 7] {
    [
        Cd::usage(),
        Echo::usage(),
        Exit::usage(),
        Fg::usage(),
        Help::usage(),
        Jobs::usage(),
        Pwd::usage(),
    ]
}
