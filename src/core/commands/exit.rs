use super::{Builtin, CommandError};
use crate::core::state::ShellState;

/// `exit` / `quit`: stop the read loop. Operands are ignored.
#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for ExitCommand {
    fn execute(&self, _args: &[String], state: &mut ShellState) -> Result<(), CommandError> {
        state.stop();
        Ok(())
    }
}
