use std::io::{BufRead, Write};

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{config::Configurer, Editor};

mod completer;

pub use completer::ShellCompleter;

use crate::error::ShellError;

/// Result of one read from a [`LineSource`].
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line with its terminator removed.
    Line(String),
    /// The user interrupted the read; nothing was entered.
    Interrupted,
    Eof,
}

/// Where the read loop gets its lines from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}

/// Removes a single trailing `\n` (or `\r\n`).
pub fn strip_line_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Plain buffered reader for scripts, pipes and tests. Writes the prompt to
/// `output` before every read.
pub struct BufferedSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> BufferedSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> LineSource for BufferedSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }

        strip_line_terminator(&mut line);
        Ok(ReadOutcome::Line(line))
    }
}

/// Interactive line editor. History stays in memory for the session only.
pub struct EditorSource {
    editor: Editor<ShellCompleter, DefaultHistory>,
}

impl EditorSource {
    pub fn new(completer: ShellCompleter) -> Result<Self, ShellError> {
        let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(completer));
        editor.set_auto_add_history(true);

        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(mut line) => {
                strip_line_terminator(&mut line);
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }
}
