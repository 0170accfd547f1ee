//! Sish - Simple Shell
//!
//! Reads one line at a time, runs built-ins in-process and launches everything
//! else as child processes, optionally connected through a single pipe and/or
//! file redirection, optionally detached as a tracked background job.

#![deny(missing_debug_implementations, unused_import_braces)]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

#[macro_use]
mod util;

pub mod core;
mod editor;
pub mod errors;
pub mod shell;

pub use crate::shell::{Shell, ShellConfig};
pub use crate::util::SishExitStatusExt;
