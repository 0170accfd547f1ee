use crate::core::pipeline::Pipeline;
use crate::core::redirect::Redirects;
use crate::core::tokenizer;
use crate::errors::Result;

/// A fully resolved input line, ready for the launcher.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// Command line, used for messages
    pub input: String,
    /// Words left after redirections were stripped; still contains `|`
    pub argv: Vec<String>,
    pub redirects: Redirects,
    /// Present when `argv` contains a `|`
    pub pipeline: Option<Pipeline>,
    /// Run the command in the background, defaults to false
    pub background: bool,
}

impl Command {
    /// Parses `input`, returning `None` for a blank line.
    pub fn parse(input: &str) -> Result<Option<Command>> {
        let line = tokenizer::tokenize(input)?;
        if line.is_empty() {
            return Ok(None);
        }

        let mut argv = line.argv;
        let redirects = Redirects::resolve(&mut argv)?;
        let pipeline = Pipeline::split(&argv[..])?;
        Ok(Some(Command {
            input: input.trim().to_string(),
            argv,
            redirects,
            pipeline,
            background: line.background,
        }))
    }

    /// Name of the program to run. Empty when the line held nothing but
    /// redirections.
    pub fn program(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }
}
