use crate::core::config::ConfigError;
use crate::process::ProcessError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    InputClosed,
    ProcessError(ProcessError),
    ConfigError(ConfigError),
    FlagError(String),
    CtrlC(String),
}

impl ShellError {
    /// Process exit status for an error that ends the interpreter.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::FlagError(_) => 2,
            _ => 1,
        }
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ctrlc::Error> for ShellError {
    fn from(err: ctrlc::Error) -> Self {
        ShellError::CtrlC(err.to_string())
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::ProcessError(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::ConfigError(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "readline: {}", e),
            ShellError::Io(e) => write!(f, "read: {}", e),
            ShellError::InputClosed => write!(f, "read: end of input"),
            ShellError::ProcessError(e) => write!(f, "Process error: {}", e),
            ShellError::ConfigError(e) => write!(f, "Config error: {}", e),
            ShellError::FlagError(msg) => write!(f, "Flag error: {}", msg),
            ShellError::CtrlC(msg) => write!(f, "Ctrl-C error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}
