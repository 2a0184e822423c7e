use std::fmt;

pub mod executor;
pub mod jobs;
pub mod signal;

pub use executor::{Execution, ProcessExecutor};
pub use jobs::{FinishedJob, Job, JobTable};

/// Status a child exits with when its program could not be executed.
pub const EXEC_FAILURE_STATUS: i32 = 127;

#[derive(Debug)]
pub enum ProcessError {
    Empty,
    InvalidArgument(String),
    Spawn(std::io::Error),
    Wait(std::io::Error),
    SignalError(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Empty => write!(f, "no command given"),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::Spawn(e) => write!(f, "fork: {}", e),
            ProcessError::Wait(e) => write!(f, "waitpid: {}", e),
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Decoded `waitpid` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(i32),
}

impl ExitStatus {
    pub fn from_raw(status: libc::c_int) -> Self {
        if libc::WIFSIGNALED(status) {
            ExitStatus::Signaled(libc::WTERMSIG(status))
        } else {
            ExitStatus::Exited(libc::WEXITSTATUS(status))
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Exited(code) => Some(*code),
            ExitStatus::Signaled(_) => None,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit code {}", code),
            ExitStatus::Signaled(sig) => write!(f, "signal {}", sig),
        }
    }
}
