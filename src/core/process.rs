//! Process primitives shared by the launcher and the pipeline executor.

use std::ffi::{CStr, CString};
use std::process::ExitStatus;

use nix::errno::Errno;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use crate::errors::{Error, ErrorKind, Result, ResultExt};
use crate::util::SishExitStatusExt;

pub const COMMAND_NOT_FOUND_EXIT_STATUS: i32 = 127;
pub const EXEC_FAILURE_EXIT_STATUS: i32 = 126;
/// Status for failures of the shell itself or of a child's own setup (dup2,
/// pipe). Same as `exit(-1)`.
pub const FATAL_EXIT_STATUS: i32 = 255;

/// An argument vector converted for `execvp(3)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Argv {
    args: Vec<CString>,
}

impl Argv {
    /// Fails on an empty vector or on words containing a NUL byte.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Argv> {
        if words.is_empty() {
            return Err(Error::syntax(""));
        }

        let args = words
            .iter()
            .map(|w| CString::new(w.as_ref()).map_err(|_| Error::syntax(w.as_ref())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Argv { args })
    }

    pub fn program(&self) -> &CStr {
        &self.args[0]
    }

    pub fn program_name(&self) -> String {
        self.program().to_string_lossy().into_owned()
    }
}

/// Forks the current process.
pub fn fork() -> Result<ForkResult> {
    // The shell is single-threaded.
    let result = unsafe { unistd::fork() };
    result.chain_err(|| ErrorKind::Fork)
}

/// Replaces the process image with `argv`, searching `PATH` for the program.
///
/// Only returns on failure, after reporting the error; the value is the exit
/// status the child should terminate with.
pub fn exec(argv: &Argv) -> i32 {
    reset_signal_dispositions();
    let err = match unistd::execvp(argv.program(), &argv.args) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    if err == Errno::ENOENT {
        eprintln!("sish: {}", ErrorKind::CommandNotFound(argv.program_name()));
        COMMAND_NOT_FOUND_EXIT_STATUS
    } else {
        eprintln!("sish: {}: {}", argv.program_name(), err);
        EXEC_FAILURE_EXIT_STATUS
    }
}

/// Restores the default SIGPIPE action. The Rust runtime ignores SIGPIPE and
/// `execvp` keeps ignored dispositions.
fn reset_signal_dispositions() {
    // signal(3) only fails on an invalid signal number or handler.
    let result = unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) };
    log_if_err!(result, "failed to reset SIGPIPE signal handler");
}

/// Blocks until `pid` exits.
pub fn wait_for_process(pid: Pid) -> Result<ExitStatus> {
    loop {
        match wait::waitpid(pid, None) {
            Ok(status) => {
                if let Some(exit_status) = exit_status(status) {
                    debug!("{} finished with {}", pid, exit_status);
                    return Ok(exit_status);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Checks whether `pid` has exited without blocking, reaping it if so.
pub fn try_wait(pid: Pid) -> Result<Option<ExitStatus>> {
    let status = wait::waitpid(pid, Some(WaitPidFlag::WNOHANG))?;
    Ok(exit_status(status))
}

fn exit_status(status: WaitStatus) -> Option<ExitStatus> {
    match status {
        WaitStatus::Exited(_, code) => Some(ExitStatus::from_status(code)),
        WaitStatus::Signaled(_, signal, _) => Some(ExitStatus::from_status(128 + signal as i32)),
        _ => None,
    }
}
