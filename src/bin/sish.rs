#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use docopt::Docopt;
use nix::unistd;
use sish::core::process::FATAL_EXIT_STATUS;
use sish::{Shell, ShellConfig, SishExitStatusExt};
use std::path::PathBuf;
use std::process::ExitStatus;

const COMMAND_HISTORY_CAPACITY: usize = 100;
const LOG_FILE_NAME: &str = ".sish_log";

const USAGE: &str = "
sish.

Usage:
    sish [options]
    sish [options] -c <command>
    sish [options] <file>
    sish (-h | --help)
    sish --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    -c              If the -c option is present, then commands are read from the first non-option
                        argument command_string.
    --log=<path>    File to write log to, defaults to ~/.sish_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    arg_file: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logger(&args.flag_log);
    debug!("{:?}", args);

    if args.flag_version {
        println!("sish version {}", env!("CARGO_PKG_VERSION"));
    } else if args.flag_c || args.arg_file.is_some() {
        execute_from_command_string_or_file(&args);
    } else {
        execute_from_stdin();
    }
}

/// Logs to `path`, or `~/.sish_log`. Logging is skipped entirely if the
/// file cannot be opened.
fn init_logger(path: &Option<String>) {
    let log_path = match path.clone().map(PathBuf::from).or_else(default_log_path) {
        Some(log_path) => log_path,
        None => return,
    };
    let log_file = match fern::log_file(&log_path) {
        Ok(log_file) => log_file,
        Err(_) => return,
    };

    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                unistd::getpid(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(log_file)
        .apply();
    if let Err(e) = result {
        eprintln!("sish: failed to initialize logging: {}", e);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

fn execute_from_command_string_or_file(args: &Args) -> ! {
    let mut shell = Shell::new(ShellConfig::noninteractive());

    let result = if let Some(ref command) = args.arg_command {
        shell.execute_command_string(command)
    } else if let Some(ref file_path) = args.arg_file {
        shell.execute_commands_from_file(file_path)
    } else {
        unreachable!();
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("sish: {}", e);
        shell.exit(Some(ExitStatus::from_status(FATAL_EXIT_STATUS)));
    }
    shell.exit(None)
}

fn execute_from_stdin() -> ! {
    let mut shell = Shell::new(ShellConfig::interactive(COMMAND_HISTORY_CAPACITY));
    shell.execute_from_stdin()
}
