//! Launch decision for a parsed command.
//!
//! Built-ins run inside the shell. Everything else is forked: the child
//! execs the program (or runs the pipeline and exits), while the shell
//! either waits for it or registers it as a background job. Redirections are
//! applied to the shell before the fork, so the child inherits them, and are
//! undone in the shell once the launch is over.

use std::io::{self, Write};
use std::process::{self, ExitStatus};

use nix::unistd::{ForkResult, Pid};

use crate::core::command::Command;
use crate::core::pipeline;
use crate::core::process::{self as proc, Argv, FATAL_EXIT_STATUS};
use crate::core::redirect;
use crate::errors::{Error, Result};
use crate::shell::{builtins, Shell};
use crate::util::SishExitStatusExt;

/// What the forked child runs.
#[derive(Debug)]
enum Program {
    Simple(Argv),
    Pipeline(Argv, Argv),
}

impl Program {
    fn new(command: &Command) -> Result<Program> {
        match command.pipeline {
            Some(ref pipeline) => {
                let (left, right) = pipeline.argvs()?;
                Ok(Program::Pipeline(left, right))
            }
            None => Ok(Program::Simple(Argv::new(&command.argv[..])?)),
        }
    }

    /// Runs inside the forked child and returns the status it should exit
    /// with. A pipeline child always terminates once both stages finish; it
    /// never returns to reading input.
    fn run(&self) -> i32 {
        match *self {
            Program::Simple(ref argv) => proc::exec(argv),
            Program::Pipeline(ref left, ref right) => match pipeline::execute(left, right) {
                Ok(status) => status.code().unwrap_or(FATAL_EXIT_STATUS),
                Err(e) => {
                    eprintln!("sish: {}", e);
                    FATAL_EXIT_STATUS
                }
            },
        }
    }
}

pub fn launch(shell: &mut Shell, command: &Command) -> Result<()> {
    if command.argv.is_empty() {
        return Err(Error::syntax(&command.input));
    }

    if command.pipeline.is_none() && builtins::is_builtin(command.program()) {
        run_builtin(shell, command)
    } else {
        run_external(shell, command)
    }
}

fn run_builtin(shell: &mut Shell, command: &Command) -> Result<()> {
    let stdio = redirect::redirect_stdio(&command.redirects)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let (status, result) = builtins::run(shell, command.program(), &command.argv[1..], &mut handle);
    log_if_err!(handle.flush(), "failed to flush builtin output");
    drop(handle);
    drop(stdio);

    if let Err(e) = result {
        eprintln!("sish: {}", e);
    }
    shell.set_last_exit_status(status);
    Ok(())
}

fn run_external(shell: &mut Shell, command: &Command) -> Result<()> {
    let program = Program::new(command)?;
    if command.background {
        // Reject before launching anything the table could not track.
        shell.jobs().check_admission(command.program())?;
    }

    let stdio = redirect::redirect_stdio(&command.redirects)?;
    log_if_err!(io::stdout().flush(), "failed to flush stdout");

    let pid = match proc::fork()? {
        ForkResult::Child => {
            if let Some(stdio) = stdio {
                stdio.release();
            }
            process::exit(program.run())
        }
        ForkResult::Parent { child } => child,
    };
    debug!("forked {} for '{}'", pid, command.input);

    let result = if command.background {
        register(shell, pid, command.program())
    } else {
        proc::wait_for_process(pid).map(|status| shell.set_last_exit_status(status))
    };

    drop(stdio);
    result
}

fn register(shell: &mut Shell, pid: Pid, label: &str) -> Result<()> {
    match shell.jobs_mut().add(pid, label) {
        Ok(_) => {
            shell.set_last_exit_status(ExitStatus::from_success());
            Ok(())
        }
        Err(e) => {
            shell.jobs_mut().track_stray(pid);
            Err(e)
        }
    }
}
