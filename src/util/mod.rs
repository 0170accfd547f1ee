use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Logs the error of a `Result` that is deliberately not propagated.
macro_rules! log_if_err {
    ($result:expr, $fmt:expr) => {
        if let Err(ref e) = $result {
            error!(concat!($fmt, ": {}"), e);
        }
    };
    ($result:expr, $fmt:expr, $($arg:tt)+) => {
        if let Err(ref e) = $result {
            error!(concat!($fmt, ": {}"), $($arg)+, e);
        }
    };
}

pub use self::unix::isatty;

pub mod unix;

/// Sish Utility Extensions for `ExitStatus`
pub trait SishExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus to indicate *unsuccessful* program execution.
    fn from_failure() -> Self;

    /// Create an ExitStatus from a status code
    fn from_status(code: i32) -> Self;
}

impl SishExitStatusExt for ExitStatus {
    /// # Examples
    /// ```rust
    /// use sish::SishExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_success().success());
    /// ```
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    /// # Examples
    /// ```rust
    /// use sish::SishExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(!ExitStatus::from_failure().success());
    /// ```
    fn from_failure() -> Self {
        ExitStatus::from_status(1)
    }

    /// # Examples
    /// ```rust
    /// use sish::SishExitStatusExt;
    /// use std::process::ExitStatus;
    /// assert!(ExitStatus::from_status(0).success());
    /// assert_eq!(ExitStatus::from_status(3).code(), Some(3));
    /// ```
    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw((code & 0xff) << 8)
    }
}

/// Folds any status code into the `0..=255` range the OS reports, so `-1`
/// becomes `255` like it does for C programs.
pub fn code_like_u8(code: i32) -> i32 {
    if code < 0 {
        (256 + code % 256) % 256
    } else {
        code % 256
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_like_u8() {
        assert_eq!(code_like_u8(0), 0);
        assert_eq!(code_like_u8(-1), 255);
        assert_eq!(code_like_u8(300), 44);
        assert_eq!(code_like_u8(-300), 212);
    }

    #[test]
    fn test_from_status_round_trips_code() {
        assert_eq!(ExitStatus::from_status(127).code(), Some(127));
        assert_eq!(ExitStatus::from_failure().code(), Some(1));
    }
}
