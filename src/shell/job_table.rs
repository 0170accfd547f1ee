//! Bounded table of background jobs.
//!
//! A job's 1-based position is the only identifier users see. Positions are
//! dense: removing a job shifts every later job down by one, so a position
//! read from an earlier `jobs` listing may name a different job later.

use std::fmt;
use std::process::ExitStatus;

use nix::errno::Errno;
use nix::unistd::Pid;

use crate::core::job::{Job, JobId, Label};
use crate::core::process;
use crate::errors::{Error, ErrorKind, Result};
use crate::util::SishExitStatusExt;

/// Default number of background jobs tracked at once.
pub const DEFAULT_JOB_CAPACITY: usize = 15;

pub struct JobTable {
    jobs: Vec<Job>,
    capacity: usize,
    job_count: u32,
    /// Background children that could not be registered; reaped silently.
    strays: Vec<Pid>,
}

impl JobTable {
    pub fn with_capacity(capacity: usize) -> JobTable {
        JobTable {
            jobs: Vec::with_capacity(capacity),
            capacity,
            job_count: 0,
            strays: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Checks that a job labelled `label` could be added right now, without
    /// adding it.
    pub fn check_admission(&self, label: &str) -> Result<()> {
        if self.is_full() {
            return Err(ErrorKind::JobTableFull(self.capacity).into());
        }
        Label::new(label).map(|_| ())
    }

    /// Appends a job for `pid`.
    pub fn add(&mut self, pid: Pid, label: &str) -> Result<JobId> {
        self.check_admission(label)?;
        let label = Label::new(label)?;

        self.job_count += 1;
        let id = JobId(self.job_count);
        info!("added job {} ({}) for pid {}", id, label, pid);
        self.jobs.push(Job::new(id, pid, label));
        Ok(id)
    }

    /// Removes the job for `pid`, compacting later positions.
    pub fn remove(&mut self, pid: Pid) -> Result<Job> {
        let index = self
            .jobs
            .iter()
            .position(|job| job.pid() == pid)
            .ok_or_else(|| Error::from(ErrorKind::NoSuchJob(pid.as_raw())))?;
        let job = self.jobs.remove(index);
        info!("removed job {} ({}) for pid {}", job.id(), job.label(), pid);
        Ok(job)
    }

    /// Jobs paired with their current 1-based position.
    pub fn list(&self) -> impl Iterator<Item = (usize, &Job)> {
        self.jobs.iter().enumerate().map(|(i, job)| (i + 1, job))
    }

    pub fn get(&self, position: usize) -> Option<&Job> {
        position.checked_sub(1).and_then(|i| self.jobs.get(i))
    }

    /// Blocks until the job at `position` exits, then removes it.
    pub fn foreground_wait(&mut self, position: usize) -> Result<ExitStatus> {
        let pid = self
            .get(position)
            .map(Job::pid)
            .ok_or_else(|| Error::from(ErrorKind::InvalidPosition(position.to_string())))?;
        debug!("waiting for job at position {} (pid {})", position, pid);

        let status = match process::wait_for_process(pid) {
            Ok(status) => Some(status),
            // Someone else already collected it; it is gone either way.
            Err(ref e) if is_no_child(e) => {
                warn!("pid {} was already reaped", pid);
                None
            }
            Err(e) => return Err(e),
        };

        self.remove(pid)?;
        Ok(status.unwrap_or_else(ExitStatus::from_success))
    }

    /// Removes every job whose process has already exited. Never blocks.
    pub fn reap_finished(&mut self) -> Vec<Job> {
        let finished: Vec<Pid> = self
            .jobs
            .iter()
            .map(Job::pid)
            .filter(|&pid| has_exited(pid))
            .collect();

        let mut reaped = Vec::with_capacity(finished.len());
        for pid in finished {
            match self.remove(pid) {
                Ok(job) => reaped.push(job),
                Err(e) => error!("could not find job during removal: {}", e),
            }
        }

        self.strays.retain(|&pid| !has_exited(pid));
        reaped
    }

    /// Keeps an unregistered background child around only so it gets reaped.
    pub fn track_stray(&mut self, pid: Pid) {
        warn!("pid {} is running untracked", pid);
        self.strays.push(pid);
    }

    /// Number of untracked background children not yet reaped.
    pub fn stray_count(&self) -> usize {
        self.strays.len()
    }
}

impl Default for JobTable {
    fn default() -> JobTable {
        JobTable::with_capacity(DEFAULT_JOB_CAPACITY)
    }
}

impl fmt::Debug for JobTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} jobs\tcapacity: {}\tjob_count: {}\tstrays: {}",
            self.jobs.len(),
            self.capacity,
            self.job_count,
            self.strays.len()
        )?;
        for (position, job) in self.list() {
            writeln!(f, "[{}] id: {}\tpid: {}\tlabel: {}", position, job.id(), job.pid(), job.label())?;
        }

        Ok(())
    }
}

fn has_exited(pid: Pid) -> bool {
    match process::try_wait(pid) {
        Ok(status) => status.is_some(),
        Err(ref e) if is_no_child(e) => true,
        Err(e) => {
            error!("failed to check on pid {}: {}", pid, e);
            false
        }
    }
}

fn is_no_child(e: &Error) -> bool {
    match *e.kind() {
        ErrorKind::Nix(Errno::ECHILD) => true,
        _ => false,
    }
}
