use nix::libc;
use nix::unistd;

/// Returns `true` when the shell's standard input is a terminal.
pub fn isatty() -> bool {
    let temp_result = unistd::isatty(libc::STDIN_FILENO);
    log_if_err!(temp_result, "unistd::isatty");
    temp_result.unwrap_or(false)
}
