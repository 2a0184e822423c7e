use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::executor::wait_for;
use super::{signal, ExitStatus, ProcessError};

/// A background child the shell is still responsible for.
#[derive(Debug, Clone)]
pub struct Job {
    pid: libc::pid_t,
    command: String,
    started: Instant,
}

impl Job {
    pub fn pid(&self) -> libc::pid_t {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A job collected by the reaper. `status` is `None` when the child was
/// already collected elsewhere and its status is lost.
#[derive(Debug)]
pub struct FinishedJob {
    pub job: Job,
    pub status: Option<ExitStatus>,
}

impl fmt::Display for FinishedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] Done ({})  {}", self.job.pid, status, self.job.command),
            None => write!(f, "[{}] Done  {}", self.job.pid, self.job.command),
        }
    }
}

enum Poll {
    Running,
    Finished(Option<ExitStatus>),
    Retry,
}

/// Background children keyed by pid, reaped without blocking.
///
/// Once [`JobTable::watch_child_signals`] is called, `reap` only polls after a
/// `SIGCHLD` has been seen; otherwise it polls on every call.
pub struct JobTable {
    jobs: BTreeMap<libc::pid_t, Job>,
    child_signal: Arc<AtomicBool>,
    watching: bool,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
            child_signal: Arc::new(AtomicBool::new(false)),
            watching: false,
        }
    }

    pub fn watch_child_signals(&mut self) -> Result<(), ProcessError> {
        signal::watch_child_exits(Arc::clone(&self.child_signal))?;
        self.watching = true;
        Ok(())
    }

    pub fn insert(&mut self, pid: libc::pid_t, command: String) {
        self.jobs.insert(
            pid,
            Job {
                pid,
                command,
                started: Instant::now(),
            },
        );
    }

    pub fn get(&self, pid: libc::pid_t) -> Option<&Job> {
        self.jobs.get(&pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Collects every tracked child that has terminated. Never blocks.
    pub fn reap(&mut self) -> Vec<FinishedJob> {
        if self.jobs.is_empty() {
            return Vec::new();
        }
        if self.watching && !self.child_signal.swap(false, Ordering::SeqCst) {
            return Vec::new();
        }

        let mut finished = Vec::new();
        let pids: Vec<libc::pid_t> = self.jobs.keys().copied().collect();
        for pid in pids {
            match poll(pid) {
                Poll::Running => {}
                Poll::Retry => self.child_signal.store(true, Ordering::SeqCst),
                Poll::Finished(status) => {
                    if let Some(job) = self.jobs.remove(&pid) {
                        log::debug!("reaped pid {} after {:?}", pid, job.elapsed());
                        finished.push(FinishedJob { job, status });
                    }
                }
            }
        }
        finished
    }

    /// Blocks until every tracked child has terminated.
    pub fn wait_all(&mut self) -> Vec<FinishedJob> {
        let jobs = std::mem::take(&mut self.jobs);
        jobs.into_values()
            .map(|job| FinishedJob {
                status: wait_for(job.pid).ok(),
                job,
            })
            .collect()
    }
}

fn poll(pid: libc::pid_t) -> Poll {
    let mut status: libc::c_int = 0;
    // SAFETY: status is a valid out-pointer.
    let rc = unsafe { libc::waitpid(pid, &mut status, libc::WNOHANG) };

    if rc == 0 {
        Poll::Running
    } else if rc == pid {
        Poll::Finished(Some(ExitStatus::from_raw(status)))
    } else {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            Poll::Retry
        } else {
            log::warn!("waitpid({}) failed: {}", pid, err);
            Poll::Finished(None)
        }
    }
}
