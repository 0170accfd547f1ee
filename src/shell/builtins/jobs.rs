use crate::shell::builtins::{self, prelude::*};

pub struct Jobs;

impl builtins::BuiltinCommand for Jobs {
    const NAME: &'static str = builtins::JOBS_NAME;

    const HELP: &'static str = "\
jobs: jobs
    Display the background jobs.

    Prints the job count, then one line per job: its position, the command
    and its process ID. Positions are renumbered whenever a job finishes or
    is brought to the foreground, so a job's number can change between two
    listings.";

    fn run<T: AsRef<str>>(shell: &mut Shell, _args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let jobs = shell.jobs();
        writeln!(stdout, "Job count: {}", jobs.len())?;
        for (position, job) in jobs.list() {
            writeln!(stdout, "[{}] {}\t{}", position, job.label(), job.pid())?;
        }

        Ok(())
    }
}

pub struct Fg;

impl builtins::BuiltinCommand for Fg {
    const NAME: &'static str = builtins::FG_NAME;

    const HELP: &'static str = "\
fg: fg <position>
    Wait for a background job to finish.

    Blocks until the job at POSITION (as shown by jobs) exits, then removes
    it from the job list. Later jobs move up one position.

    Exit Status:
    Status of the job waited for, or failure if POSITION is invalid.";

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], _stdout: &mut dyn Write) -> Result<()> {
        let arg = match args.first() {
            Some(arg) => arg.as_ref(),
            None => return Err(Error::builtin_command("fg: job number not specified", 1)),
        };
        let position = arg
            .parse::<usize>()
            .map_err(|_| Error::from(ErrorKind::InvalidPosition(arg.to_string())))?;

        let status = shell.jobs_mut().foreground_wait(position)?;
        shell.set_last_exit_status(status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use crate::shell::ShellConfig;
    use nix::unistd::Pid;

    #[test]
    fn test_jobs_listing() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        shell.jobs_mut().add(Pid::from_raw(4001), "sleep").unwrap();
        shell.jobs_mut().add(Pid::from_raw(4002), "yes").unwrap();

        let mut stdout = Vec::new();
        Jobs::run::<&str>(&mut shell, &[], &mut stdout).unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "Job count: 2\n[1] sleep\t4001\n[2] yes\t4002\n"
        );
    }

    #[test]
    fn test_jobs_empty() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let mut stdout = Vec::new();
        Jobs::run::<&str>(&mut shell, &[], &mut stdout).unwrap();
        assert_eq!(stdout, b"Job count: 0\n");
    }

    #[test]
    fn test_fg_bad_arguments() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        assert!(Fg::run::<&str>(&mut shell, &[], &mut io::sink()).is_err());
        assert!(Fg::run(&mut shell, &["abc"], &mut io::sink()).is_err());
        assert!(Fg::run(&mut shell, &["1"], &mut io::sink()).is_err());
    }
}
