use std::borrow::Cow;

mod command;
mod path;

use command::CommandCompleter;
use path::PathCompleter;

use crate::highlight::SyntaxHighlighter;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

/// Line-editor helper: completes the command word and paths, and colors the
/// command word.
#[derive(Clone)]
pub struct ShellCompleter {
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl ShellCompleter {
    pub fn new<'a>(
        builtins: impl IntoIterator<Item = &'a str>,
        highlighter: SyntaxHighlighter,
    ) -> Self {
        ShellCompleter {
            command_completer: CommandCompleter::new(builtins),
            path_completer: PathCompleter::new(),
            highlighter,
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before_cursor = &line[..pos];
        let word_start = before_cursor.rfind(' ').map_or(0, |i| i + 1);
        let word = &before_cursor[word_start..];

        if before_cursor[..word_start].trim().is_empty() {
            (word_start, self.command_completer.complete_command(word))
        } else {
            (word_start, self.path_completer.complete_path(word))
        }
    }
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlighter.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer() -> ShellCompleter {
        ShellCompleter::new(["cd", "chdir", "exit", "quit"], SyntaxHighlighter::plain())
    }

    #[test]
    fn test_first_word_completes_commands() {
        let (start, matches) = completer().candidates("  qu", 4);
        assert_eq!(start, 2);
        assert!(matches.iter().any(|p| p.display == "quit"));
    }

    #[test]
    fn test_later_words_complete_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("target")).unwrap();

        let line = format!("cd {}/ta", dir.path().display());
        let (start, matches) = completer().candidates(&line, line.len());

        assert_eq!(start, 3);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].display.ends_with("/target/"));
    }
}
