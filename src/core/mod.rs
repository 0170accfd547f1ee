//! Command model and process primitives.

pub mod command;
pub mod job;
pub mod pipeline;
pub mod process;
pub mod redirect;
pub mod tokenizer;
