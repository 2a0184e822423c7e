use super::{Builtin, CommandError};
use crate::core::state::ShellState;
use std::env;
use std::path::PathBuf;

/// `cd` / `chdir`: change the interpreter's own working directory.
#[derive(Clone)]
pub struct CdCommand;

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self
    }

    /// The explicit operand verbatim, or `$HOME` when none was given.
    pub fn target(&self, args: &[String]) -> Result<PathBuf, CommandError> {
        resolve_target(args, dirs::home_dir)
    }
}

impl Builtin for CdCommand {
    fn execute(&self, args: &[String], _state: &mut ShellState) -> Result<(), CommandError> {
        let path = self.target(args)?;
        log::debug!("changing directory to {}", path.display());

        env::set_current_dir(&path)
            .map_err(|source| CommandError::ChangeDirectory { path, source })
    }
}

// `home_dir` is only consulted when `HOME` is unset.
fn resolve_target(
    args: &[String],
    home_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, CommandError> {
    match args.first() {
        Some(path) => Ok(PathBuf::from(path)),
        None => env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(home_dir)
            .ok_or(CommandError::HomeDirNotFound),
    }
}
