use crate::shell::builtins::{self, prelude::*};

pub struct Echo;

impl builtins::BuiltinCommand for Echo {
    const NAME: &'static str = builtins::ECHO_NAME;

    const HELP: &'static str = "\
echo: echo [arg ...]
    Write the arguments separated by single spaces, followed by a newline.";

    fn run<T: AsRef<str>>(_shell: &mut Shell, args: &[T], stdout: &mut dyn Write) -> Result<()> {
        let words: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
        writeln!(stdout, "{}", words.join(" "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ShellConfig;

    #[test]
    fn test_echo() {
        let mut shell = Shell::new(ShellConfig::noninteractive());
        let mut stdout = Vec::new();
        Echo::run(&mut shell, &["hello", "world"], &mut stdout).unwrap();
        assert_eq!(stdout, b"hello world\n");

        let mut stdout = Vec::new();
        Echo::run::<&str>(&mut shell, &[], &mut stdout).unwrap();
        assert_eq!(stdout, b"\n");
    }
}
