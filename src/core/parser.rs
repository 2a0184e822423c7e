use std::fmt;

/// Token that sends a command to the background. Everything from the marker
/// onward is dropped.
pub const BACKGROUND_MARKER: &str = "#";

/// One parsed input line: the program name followed by its arguments, plus
/// whether it should run in the background.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    args: Vec<String>,
    background: bool,
}

impl Command {
    pub fn new(args: Vec<String>, background: bool) -> Self {
        Self { args, background }
    }

    /// Splits `line` on runs of spaces. No quoting or escaping is recognized.
    pub fn parse(line: &str) -> Self {
        let mut args = Vec::new();

        for token in line.split(' ').filter(|t| !t.is_empty()) {
            if token == BACKGROUND_MARKER {
                return Self::new(args, true);
            }
            args.push(token.to_string());
        }

        Self::new(args, false)
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments after the program name.
    pub fn operands(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }

    pub fn is_background(&self) -> bool {
        self.background
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}
