//! Line tokenizer
//!
//! Splits a raw input line into an argument vector. There is no quoting,
//! escaping or expansion: words are separated by runs of spaces, tabs and
//! newlines, and an ampersand anywhere marks the line for the background.

use crate::errors::{ErrorKind, Result};

/// Maximum number of words accepted on a single line, operators included.
pub const MAX_ARGS: usize = 20;

const BACKGROUND_OPERATOR: char = '&';

/// A tokenized input line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandLine {
    /// Words of the line in order, operators still included
    pub argv: Vec<String>,
    /// Run the command in the background, defaults to false
    pub background: bool,
}

impl CommandLine {
    /// Returns `true` if the line contained no words.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Tokenizes `line`, rejecting lines with more than `MAX_ARGS` words.
pub fn tokenize(line: &str) -> Result<CommandLine> {
    let background = line.contains(BACKGROUND_OPERATOR);
    let argv: Vec<String> = line
        .split(|c| c == ' ' || c == '\t' || c == '\n' || c == BACKGROUND_OPERATOR)
        .map(trim_control)
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect();

    if argv.len() > MAX_ARGS {
        return Err(ErrorKind::TooManyArguments(argv.len(), MAX_ARGS).into());
    }

    Ok(CommandLine { argv, background })
}

/// Cuts a word at its first control character (e.g. a trailing `\r`).
fn trim_control(word: &str) -> &str {
    match word.find(|c: char| c.is_ascii_control()) {
        Some(end) => &word[..end],
        None => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).unwrap().argv
    }

    #[test]
    fn test_simple_line() {
        assert_eq!(words("ls -l /tmp\n"), vec!["ls", "-l", "/tmp"]);
        assert!(!tokenize("ls").unwrap().background);
    }

    #[test]
    fn test_runs_of_whitespace() {
        assert_eq!(words("  echo \t\t a   b  "), vec!["echo", "a", "b"]);
        assert!(tokenize(" \t \n").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_control_characters() {
        assert_eq!(words("cat file\r\n"), vec!["cat", "file"]);
        assert_eq!(words("ab\x07cd"), vec!["ab"]);
    }

    #[test]
    fn test_background_anywhere() {
        let line = tokenize("sleep 5 &").unwrap();
        assert!(line.background);
        assert_eq!(line.argv, vec!["sleep", "5"]);

        let line = tokenize("sleep&5").unwrap();
        assert!(line.background);
        assert_eq!(line.argv, vec!["sleep", "5"]);
    }

    #[test]
    fn test_operators_are_words() {
        assert_eq!(
            words("cat < in.txt | sort >> out.txt"),
            vec!["cat", "<", "in.txt", "|", "sort", ">>", "out.txt"]
        );
    }

    #[test]
    fn test_capacity_bound() {
        let at_capacity = vec!["w"; MAX_ARGS].join(" ");
        assert_eq!(words(&at_capacity).len(), MAX_ARGS);

        let over_capacity = vec!["w"; MAX_ARGS + 1].join(" ");
        match tokenize(&over_capacity) {
            Err(e) => match *e.kind() {
                ErrorKind::TooManyArguments(count, max) => {
                    assert_eq!(count, MAX_ARGS + 1);
                    assert_eq!(max, MAX_ARGS);
                }
                ref kind => panic!("unexpected error: {}", kind),
            },
            Ok(line) => panic!("expected failure, got {:?}", line),
        }
    }
}
