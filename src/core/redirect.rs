//! Redirection resolver
//!
//! Finds `<`, `>` and `>>` in an argument vector, strips them together with
//! their filename, and remaps the calling process's standard streams.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

use nix::fcntl::{self, FcntlArg};
use nix::libc;
use nix::unistd;

use crate::errors::{Error, ErrorKind, Result, ResultExt};

const TRUNCATE_OPERATOR: &str = ">";
const APPEND_OPERATOR: &str = ">>";
const INPUT_OPERATOR: &str = "<";

/// Saved copies of the standard streams are moved above the usual range.
const SAVED_FD_MIN: RawFd = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Truncate,
    Append,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputRedirect {
    pub mode: OutputMode,
    pub path: PathBuf,
}

/// All redirections requested by one command.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Redirects {
    pub stdin: Option<PathBuf>,
    pub stdout: Option<OutputRedirect>,
}

impl Redirects {
    /// Strips every recognized redirection from `argv`.
    pub fn resolve(argv: &mut Vec<String>) -> Result<Redirects> {
        let stdout = find_output_redirection(argv)?;
        let stdin = find_input_redirection(argv)?;
        Ok(Redirects { stdin, stdout })
    }

    pub fn is_empty(&self) -> bool {
        self.stdin.is_none() && self.stdout.is_none()
    }
}

/// Removes the first `>` or `>>` and its filename from `argv`.
pub fn find_output_redirection(argv: &mut Vec<String>) -> Result<Option<OutputRedirect>> {
    let index = match argv
        .iter()
        .position(|w| w == TRUNCATE_OPERATOR || w == APPEND_OPERATOR)
    {
        Some(index) => index,
        None => return Ok(None),
    };

    let (operator, path) = take_operator(argv, index)?;
    let mode = if operator == APPEND_OPERATOR {
        OutputMode::Append
    } else {
        OutputMode::Truncate
    };
    Ok(Some(OutputRedirect { mode, path }))
}

/// Removes the first `<` and its filename from `argv`.
pub fn find_input_redirection(argv: &mut Vec<String>) -> Result<Option<PathBuf>> {
    match argv.iter().position(|w| w == INPUT_OPERATOR) {
        Some(index) => take_operator(argv, index).map(|(_, path)| Some(path)),
        None => Ok(None),
    }
}

/// Drains the operator at `index` and the filename after it, keeping the
/// relative order of the remaining words.
fn take_operator(argv: &mut Vec<String>, index: usize) -> Result<(String, PathBuf)> {
    if index + 1 >= argv.len() {
        return Err(Error::syntax(&argv[index]));
    }

    let mut removed = argv.drain(index..index + 2);
    let operator = removed.next().unwrap_or_default();
    let path = removed.next().map(PathBuf::from).unwrap_or_default();
    Ok((operator, path))
}

/// Opens the target of `redirect` and makes it the process's stdout.
pub fn apply_output(redirect: &OutputRedirect) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    match redirect.mode {
        OutputMode::Truncate => options.truncate(true),
        OutputMode::Append => options.append(true),
    };

    let file = options
        .open(&redirect.path)
        .chain_err(|| redirect_error(&redirect.path))?;
    debug!("redirecting stdout to {}", redirect.path.display());
    remap(&file, libc::STDOUT_FILENO)
}

/// Opens `path` read-only and makes it the process's stdin.
pub fn apply_input(path: &Path) -> Result<()> {
    let file = File::open(path).chain_err(|| redirect_error(path))?;
    debug!("redirecting stdin from {}", path.display());
    remap(&file, libc::STDIN_FILENO)
}

/// Points `target` at `file`. The handle itself is closed when the caller
/// drops it, leaving only the remapped descriptor.
fn remap(file: &File, target: RawFd) -> Result<()> {
    unistd::dup2(file.as_raw_fd(), target)?;
    Ok(())
}

fn redirect_error(path: &Path) -> ErrorKind {
    ErrorKind::Redirect(path.display().to_string())
}

/// Applies `redirects` to the calling process. The returned guard puts the
/// original streams back when dropped; `None` means nothing was redirected.
pub fn redirect_stdio(redirects: &Redirects) -> Result<Option<StdioGuard>> {
    if redirects.is_empty() {
        return Ok(None);
    }

    let guard = StdioGuard::save()?;
    if let Some(ref stdout) = redirects.stdout {
        apply_output(stdout)?;
    }
    if let Some(ref stdin) = redirects.stdin {
        apply_input(stdin)?;
    }
    Ok(Some(guard))
}

/// RAII struct that saves stdin and stdout and restores them on drop, on
/// every exit path including failed redirections.
#[derive(Debug)]
pub struct StdioGuard {
    stdin: RawFd,
    stdout: RawFd,
}

impl StdioGuard {
    pub fn save() -> Result<StdioGuard> {
        // Anything still buffered belongs to the original stdout.
        log_if_err!(io::stdout().flush(), "failed to flush stdout");

        let stdin = save_fd(libc::STDIN_FILENO)?;
        let stdout = match save_fd(libc::STDOUT_FILENO) {
            Ok(fd) => fd,
            Err(e) => {
                log_if_err!(unistd::close(stdin), "failed to close saved stdin");
                return Err(e);
            }
        };
        trace!("saved stdin as {} and stdout as {}", stdin, stdout);
        Ok(StdioGuard { stdin, stdout })
    }

    /// Drops the saved copies without restoring anything. Used in a forked
    /// child, which keeps the redirected streams.
    pub fn release(self) {
        log_if_err!(unistd::close(self.stdin), "failed to close saved stdin");
        log_if_err!(unistd::close(self.stdout), "failed to close saved stdout");
        mem::forget(self);
    }
}

impl Drop for StdioGuard {
    fn drop(&mut self) {
        debug!("restoring shell's standard input and output");
        log_if_err!(io::stdout().flush(), "failed to flush redirected stdout");
        log_if_err!(
            unistd::dup2(self.stdin, libc::STDIN_FILENO),
            "failed to restore stdin"
        );
        log_if_err!(
            unistd::dup2(self.stdout, libc::STDOUT_FILENO),
            "failed to restore stdout"
        );
        log_if_err!(unistd::close(self.stdin), "failed to close saved stdin");
        log_if_err!(unistd::close(self.stdout), "failed to close saved stdout");
    }
}

/// Duplicates `fd` close-on-exec so launched programs never inherit it.
fn save_fd(fd: RawFd) -> Result<RawFd> {
    fcntl::fcntl(fd, FcntlArg::F_DUPFD_CLOEXEC(SAVED_FD_MIN)).chain_err(|| ErrorKind::StdioSave)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_no_redirection() {
        let mut args = argv(&["ls", "-l"]);
        assert_eq!(Redirects::resolve(&mut args).unwrap(), Redirects::default());
        assert_eq!(args, argv(&["ls", "-l"]));
    }

    #[test]
    fn test_truncate() {
        let mut args = argv(&["echo", "hi", ">", "f.txt"]);
        let redirect = find_output_redirection(&mut args).unwrap().unwrap();
        assert_eq!(redirect.mode, OutputMode::Truncate);
        assert_eq!(redirect.path, PathBuf::from("f.txt"));
        assert_eq!(args, argv(&["echo", "hi"]));
    }

    #[test]
    fn test_append_preserves_order() {
        let mut args = argv(&["a", ">>", "log", "b", "c"]);
        let redirect = find_output_redirection(&mut args).unwrap().unwrap();
        assert_eq!(redirect.mode, OutputMode::Append);
        assert_eq!(redirect.path, PathBuf::from("log"));
        assert_eq!(args, argv(&["a", "b", "c"]));
    }

    #[test]
    fn test_only_first_output_operator() {
        let mut args = argv(&["a", ">", "one", ">", "two"]);
        let redirect = find_output_redirection(&mut args).unwrap().unwrap();
        assert_eq!(redirect.path, PathBuf::from("one"));
        assert_eq!(args, argv(&["a", ">", "two"]));
    }

    #[test]
    fn test_input_and_output() {
        let mut args = argv(&["cat", "<", "in.txt", ">", "out.txt"]);
        let redirects = Redirects::resolve(&mut args).unwrap();
        assert_eq!(redirects.stdin, Some(PathBuf::from("in.txt")));
        assert_eq!(
            redirects.stdout,
            Some(OutputRedirect {
                mode: OutputMode::Truncate,
                path: PathBuf::from("out.txt"),
            })
        );
        assert_eq!(args, argv(&["cat"]));
        assert!(!redirects.is_empty());
    }

    #[test]
    fn test_missing_filename() {
        let mut args = argv(&["echo", ">"]);
        assert!(find_output_redirection(&mut args).is_err());
        let mut args = argv(&["cat", "<"]);
        assert!(find_input_redirection(&mut args).is_err());
    }

    #[test]
    fn test_nothing_to_redirect_needs_no_guard() {
        assert!(redirect_stdio(&Redirects::default()).unwrap().is_none());
    }
}
