use std::fmt;

use nix::unistd::Pid;

use crate::errors::{ErrorKind, Result};

/// Longest command label a job may carry, in bytes.
pub const MAX_LABEL_LEN: usize = 99;

/// Internal job identifier. Unlike a job's position in the table it never
/// changes and is never reused within a shell session.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command label with an explicitly checked length bound.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Label(String);

impl Label {
    pub fn new<S: AsRef<str>>(label: S) -> Result<Label> {
        let label = label.as_ref();
        if label.len() > MAX_LABEL_LEN {
            return Err(ErrorKind::LabelTooLong(label.len(), MAX_LABEL_LEN).into());
        }

        Ok(Label(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A background process the shell launched and has not reaped yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    id: JobId,
    pid: Pid,
    label: Label,
}

impl Job {
    pub fn new(id: JobId, pid: Pid, label: Label) -> Job {
        Job { id, pid, label }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn label(&self) -> &Label {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_bound() {
        let longest = "x".repeat(MAX_LABEL_LEN);
        assert_eq!(Label::new(&longest).unwrap().as_str(), longest);

        let too_long = "x".repeat(MAX_LABEL_LEN + 1);
        let err = Label::new(&too_long).unwrap_err();
        match *err.kind() {
            ErrorKind::LabelTooLong(len, max) => {
                assert_eq!(len, MAX_LABEL_LEN + 1);
                assert_eq!(max, MAX_LABEL_LEN);
            }
            ref kind => panic!("unexpected error: {}", kind),
        }
    }

    #[test]
    fn test_job_accessors() {
        let job = Job::new(JobId(7), Pid::from_raw(4242), Label::new("sleep").unwrap());
        assert_eq!(job.id(), JobId(7));
        assert_eq!(job.pid(), Pid::from_raw(4242));
        assert_eq!(job.label().to_string(), "sleep");
    }
}
