use std::env;

use crate::shell::builtins::{self, prelude::*};

pub struct Cd;

impl builtins::BuiltinCommand for Cd {
    const NAME: &'static str = builtins::CD_NAME;

    const HELP: &'static str = "\
cd: cd [dir]
    Change the current directory to DIR. Without DIR, print the current
    directory like pwd.";

    fn run<T: AsRef<str>>(shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let dir = match args.first() {
            Some(dir) => dir.as_ref(),
            None => return Pwd::run(shell, args, stdout),
        };

        debug!("changing directory to {}", dir);
        env::set_current_dir(dir)
            .map_err(|e| Error::builtin_command(format!("cd: {}: {}", dir, e), 1))
    }
}

pub struct Pwd;

impl builtins::BuiltinCommand for Pwd {
    const NAME: &'static str = builtins::PWD_NAME;

    const HELP: &'static str = "\
pwd: pwd
    Print the name of the current working directory.";

    fn run<T: AsRef<str>>(_shell: &mut Shell, _args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let cwd = env::current_dir()
            .map_err(|e| Error::builtin_command(format!("pwd: {}", e), 1))?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use crate::shell::ShellConfig;

    #[test]
    fn test_pwd() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let mut stdout = Vec::new();
        Pwd::run::<&str>(&mut shell, &[], &mut stdout).unwrap();
        let expected = format!("{}\n", env::current_dir().unwrap().display());
        assert_eq!(String::from_utf8(stdout).unwrap(), expected);
    }

    #[test]
    fn test_cd_without_dir_prints_cwd() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let mut stdout = Vec::new();
        Cd::run::<&str>(&mut shell, &[], &mut stdout).unwrap();
        assert!(!stdout.is_empty());
    }

    #[test]
    fn test_cd_missing_dir() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let err = Cd::run(&mut shell, &["/no/such/dir/anywhere"], &mut io::sink()).unwrap_err();
        assert!(err.to_string().starts_with("cd: /no/such/dir/anywhere"));
    }
}
