use std::ffi::CString;
use std::io::{self, Write};
use std::ptr;

use super::jobs::JobTable;
use super::{ExitStatus, ProcessError, EXEC_FAILURE_STATUS};
use crate::core::parser::Command;

/// How a spawned command was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Waited for; carries the child's status.
    Foreground(ExitStatus),
    /// Left running; the pid is now tracked by the job table.
    Background(libc::pid_t),
}

/// Runs external programs in a forked child that replaces itself with
/// `execvp`.
#[derive(Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(
        &self,
        command: &Command,
        jobs: &mut JobTable,
    ) -> Result<Execution, ProcessError> {
        let pid = self.spawn(command.args())?;

        if command.is_background() {
            println!("Started background process with PID {}", pid);
            jobs.insert(pid, command.to_string());
            return Ok(Execution::Background(pid));
        }

        let status = wait_for(pid)?;
        log::debug!("pid {} finished with {}", pid, status);
        Ok(Execution::Foreground(status))
    }

    /// Forks and execs `args[0]` with `args` as its argument vector. Returns
    /// the child's pid without waiting.
    pub fn spawn(&self, args: &[String]) -> Result<libc::pid_t, ProcessError> {
        let name = args.first().ok_or(ProcessError::Empty)?;

        // Everything the child touches is allocated before the fork.
        let argv = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_str()).map_err(|_| ProcessError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(ptr::null());
        let diagnostic = format!("husk: {}: ", name).into_bytes();

        // Buffered output must not be duplicated into, or reordered around, the child.
        if let Err(e) = io::stdout().flush() {
            log::debug!("flushing stdout before fork: {}", e);
        }
        if let Err(e) = io::stderr().flush() {
            log::debug!("flushing stderr before fork: {}", e);
        }

        // SAFETY: the child only calls async-signal-safe functions before
        // exec or _exit.
        let pid = unsafe { libc::fork() };
        match pid {
            -1 => Err(ProcessError::Spawn(io::Error::last_os_error())),
            0 => exec_child(&argv_ptrs, &diagnostic),
            pid => {
                log::debug!("spawned {} as pid {}", name, pid);
                Ok(pid)
            }
        }
    }
}

fn exec_child(argv: &[*const libc::c_char], diagnostic: &[u8]) -> ! {
    // SAFETY: argv is NUL-terminated and its strings outlive the call.
    unsafe {
        libc::execvp(argv[0], argv.as_ptr());
    }

    let reason: &[u8] = match io::Error::last_os_error().raw_os_error() {
        Some(libc::ENOENT) => b"command not found\n",
        Some(libc::EACCES) => b"permission denied\n",
        _ => b"cannot execute\n",
    };

    // SAFETY: write(2) and _exit(2) are async-signal-safe.
    unsafe {
        libc::write(libc::STDERR_FILENO, diagnostic.as_ptr().cast(), diagnostic.len());
        libc::write(libc::STDERR_FILENO, reason.as_ptr().cast(), reason.len());
        libc::_exit(EXEC_FAILURE_STATUS)
    }
}

/// Blocks until `pid` terminates.
pub fn wait_for(pid: libc::pid_t) -> Result<ExitStatus, ProcessError> {
    let mut status: libc::c_int = 0;
    loop {
        // SAFETY: status is a valid out-pointer.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            return Ok(ExitStatus::from_raw(status));
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(ProcessError::Wait(err));
        }
    }
}
