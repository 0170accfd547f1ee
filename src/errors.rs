//! Error module. See the [error-chain](https://crates.io/crates/error-chain) crate for details.

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
        Readline(::rustyline::error::ReadlineError);
    }

    errors {
        /// Generic syntax error containing the offending token or line
        Syntax(line: String) {
            description("syntax error")
            display("syntax error near: '{}'", line)
        }
        TooManyArguments(count: usize, max: usize) {
            description("too many arguments")
            display("too many arguments: {} (max {})", count, max)
        }
        CommandNotFound(command: String) {
            description("command not found")
            display("{}: command not found", command)
        }
        JobTableFull(capacity: usize) {
            description("job table full")
            display("max job limit reached ({})", capacity)
        }
        LabelTooLong(len: usize, max: usize) {
            description("command label too long")
            display("command entered is too long: {} bytes (max {})", len, max)
        }
        NoSuchJob(pid: i32) {
            description("no such job")
            display("could not find job with pid {}", pid)
        }
        InvalidPosition(position: String) {
            description("invalid job position")
            display("{}: no such job", position)
        }
        BuiltinCommand(message: String, code: i32) {
            description("builtin command error")
            display("{}", message)
        }
        Redirect(path: String) {
            description("redirection failed")
            display("{}: cannot open file for redirection", path)
        }
        StdioSave {
            description("failed to save standard streams")
            display("failed to save standard input and output")
        }
        Pipe {
            description("failed to create pipe")
            display("failed to create pipe")
        }
        Fork {
            description("failed to fork")
            display("failed to fork child process")
        }
    }
}

impl Error {
    /// Setup failures in the shell's own process. The shell exits on these.
    pub fn is_fatal(&self) -> bool {
        match *self.kind() {
            ErrorKind::StdioSave | ErrorKind::Redirect(_) | ErrorKind::Pipe | ErrorKind::Fork => {
                true
            }
            _ => false,
        }
    }

    pub(crate) fn syntax<T: AsRef<str>>(line: T) -> Error {
        ErrorKind::Syntax(line.as_ref().to_string()).into()
    }

    pub(crate) fn builtin_command<T: AsRef<str>>(message: T, code: i32) -> Error {
        ErrorKind::BuiltinCommand(message.as_ref().to_string(), code).into()
    }
}
