use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::process::ProcessError;

/// Raises `flag` whenever a child changes state.
pub fn watch_child_exits(flag: Arc<AtomicBool>) -> Result<(), ProcessError> {
    signal_hook::flag::register(signal_hook::consts::SIGCHLD, flag)
        .map(|_| ())
        .map_err(|e| ProcessError::SignalError(e.to_string()))
}

/// Keeps SIGINT from killing the shell while a foreground child runs. The
/// child gets the default disposition back on exec.
pub fn setup_signal_handlers() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        log::debug!("interrupt received");
    })
}
