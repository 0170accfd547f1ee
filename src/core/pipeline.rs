//! Single-stage pipeline
//!
//! `left | right` runs both halves as separate processes connected by one
//! OS pipe. Only the first `|` splits the line; any later `|` is passed to
//! the right-hand program as an ordinary argument.

use std::fs::File;
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::process::{self, ExitStatus};

use nix::libc;
use nix::unistd::{self, ForkResult, Pid};

use crate::core::process::{self as proc, Argv, FATAL_EXIT_STATUS};
use crate::errors::{Error, ErrorKind, Result, ResultExt};

pub const PIPE_OPERATOR: &str = "|";

#[derive(Clone, Debug, PartialEq)]
pub struct Pipeline {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Pipeline {
    /// Splits `argv` at the first `|`. Returns `None` when there is no pipe
    /// and a syntax error when either side would be empty.
    pub fn split<S: AsRef<str>>(argv: &[S]) -> Result<Option<Pipeline>> {
        let index = match argv.iter().position(|w| w.as_ref() == PIPE_OPERATOR) {
            Some(index) => index,
            None => return Ok(None),
        };

        let left: Vec<String> = argv[..index].iter().map(|w| w.as_ref().to_string()).collect();
        let right: Vec<String> = argv[index + 1..]
            .iter()
            .map(|w| w.as_ref().to_string())
            .collect();
        if left.is_empty() || right.is_empty() {
            return Err(Error::syntax(PIPE_OPERATOR));
        }

        Ok(Some(Pipeline { left, right }))
    }

    /// Converts both halves for exec ahead of any fork.
    pub fn argvs(&self) -> Result<(Argv, Argv)> {
        Ok((Argv::new(&self.left[..])?, Argv::new(&self.right[..])?))
    }
}

/// Runs `left | right` to completion and returns the right-hand status.
///
/// The calling process keeps neither pipe end open while it waits: the write
/// end is closed as soon as the writer is forked so the reader sees
/// end-of-stream once the writer exits.
pub fn execute(left: &Argv, right: &Argv) -> Result<ExitStatus> {
    let (read_end, write_end) = create_pipe()?;

    debug!("starting pipeline writer {:?}", left.program());
    let writer = match proc::fork()? {
        ForkResult::Child => {
            drop(read_end);
            attach(write_end, libc::STDOUT_FILENO);
            process::exit(proc::exec(left))
        }
        ForkResult::Parent { child } => child,
    };
    drop(write_end);

    debug!("starting pipeline reader {:?}", right.program());
    let reader = match proc::fork() {
        Ok(ForkResult::Child) => {
            attach(read_end, libc::STDIN_FILENO);
            process::exit(proc::exec(right))
        }
        Ok(ForkResult::Parent { child }) => child,
        Err(e) => {
            drop(read_end);
            log_if_err!(proc::wait_for_process(writer), "failed to wait for {}", writer);
            return Err(e);
        }
    };
    drop(read_end);

    wait_stage(writer)?;
    wait_stage(reader)
}

/// Makes `end` the child's `target` stream and closes the original handle.
/// Exits the child if the descriptor cannot be duplicated.
fn attach(end: File, target: RawFd) {
    if let Err(e) = unistd::dup2(end.as_raw_fd(), target) {
        eprintln!("sish: failed to attach pipe: {}", e);
        process::exit(FATAL_EXIT_STATUS);
    }
}

fn wait_stage(pid: Pid) -> Result<ExitStatus> {
    let status = proc::wait_for_process(pid)?;
    trace!("pipeline stage {} finished with {}", pid, status);
    Ok(status)
}

/// Wraps `unistd::pipe()` to return RAII structs instead of raw, owning file descriptors
/// Returns (`read_end_pipe`, `write_end_pipe`)
fn create_pipe() -> Result<(File, File)> {
    let (read_end_pipe, write_end_pipe) = unistd::pipe().chain_err(|| ErrorKind::Pipe)?;
    unsafe {
        Ok((
            File::from_raw_fd(read_end_pipe),
            File::from_raw_fd(write_end_pipe),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pipe() {
        assert_eq!(Pipeline::split(&["ls", "-l"]).unwrap(), None);
    }

    #[test]
    fn test_split() {
        let pipeline = Pipeline::split(&["ls", "-l", "|", "wc", "-l"]).unwrap().unwrap();
        assert_eq!(pipeline.left, vec!["ls", "-l"]);
        assert_eq!(pipeline.right, vec!["wc", "-l"]);
    }

    #[test]
    fn test_second_pipe_is_an_argument() {
        let pipeline = Pipeline::split(&["a", "|", "b", "|", "c"]).unwrap().unwrap();
        assert_eq!(pipeline.left, vec!["a"]);
        assert_eq!(pipeline.right, vec!["b", "|", "c"]);
    }

    #[test]
    fn test_empty_side() {
        assert!(Pipeline::split(&["|", "wc"]).is_err());
        assert!(Pipeline::split(&["ls", "|"]).is_err());
    }

    #[test]
    fn test_argvs() {
        let pipeline = Pipeline::split(&["ls", "|", "wc"]).unwrap().unwrap();
        let (left, right) = pipeline.argvs().unwrap();
        assert_eq!(left.program_name(), "ls");
        assert_eq!(right.program_name(), "wc");
    }
}
