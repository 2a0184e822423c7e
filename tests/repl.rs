use std::cell::RefCell;
use std::collections::VecDeque;
use std::env;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use husk::core::commands::BuiltinOutcome;
use husk::core::config::Config;
use husk::error::ShellError;
use husk::input::{BufferedSource, LineSource, ReadOutcome};
use husk::process::{ExitStatus, Execution, EXEC_FAILURE_STATUS};
use husk::shell::{Dispatch, Shell};
use serial_test::serial;

fn shell_over(input: &str) -> Shell<BufferedSource<Cursor<String>, io::Sink>> {
    shell_with_config(input, Config::new())
}

fn shell_with_config(
    input: &str,
    config: Config,
) -> Shell<BufferedSource<Cursor<String>, io::Sink>> {
    let source = BufferedSource::new(Cursor::new(input.to_string()), io::sink());
    Shell::with_source(source, config)
}

/// Shared buffer the shell reports into.
#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_reporting(input: &str, config: Config) -> String {
    let captured = Captured::default();
    let mut shell = shell_with_config(input, config).with_output(captured.clone());
    shell.run().unwrap();
    captured.text()
}

/// Feeds fixed lines and records when each prompt was shown.
struct ScriptedSource {
    lines: VecDeque<String>,
    prompts: Rc<RefCell<Vec<Instant>>>,
    marker: Option<PathBuf>,
    marker_seen: Rc<RefCell<Vec<bool>>>,
}

impl ScriptedSource {
    fn new(lines: &[&str], marker: Option<&Path>) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            prompts: Rc::new(RefCell::new(Vec::new())),
            marker: marker.map(Path::to_path_buf),
            marker_seen: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
        self.prompts.borrow_mut().push(Instant::now());
        if let Some(marker) = &self.marker {
            self.marker_seen.borrow_mut().push(marker.exists());
        }
        Ok(match self.lines.pop_front() {
            Some(line) => ReadOutcome::Line(line),
            None => ReadOutcome::Eof,
        })
    }
}

#[test]
fn test_exit_and_quit_stop_before_queued_input() {
    for word in ["exit", "quit"] {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("never");
        let input = format!("{}\ntouch {}\n", word, marker.display());

        let mut shell = shell_over(&input);
        assert!(shell.run().is_ok());
        assert!(!shell.state().is_running());
        assert!(!marker.exists());
    }
}

#[test]
fn test_end_of_input_is_an_error() {
    let mut shell = shell_over("true\n");
    let result = shell.run();
    assert!(matches!(result, Err(ShellError::InputClosed)));
    assert_eq!(result.unwrap_err().exit_code(), 1);
}

#[test]
fn test_blank_and_empty_lines_are_skipped() {
    let mut shell = shell_over("\n\n     \n#\n  #  ignored\nexit\n");
    assert!(shell.run().is_ok());
    assert!(shell.jobs().is_empty());

    assert!(matches!(shell.execute_line("   "), Dispatch::Skipped));
    assert!(matches!(shell.execute_line("# sleep 5"), Dispatch::Skipped));
}

#[test]
fn test_foreground_completes_before_next_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("done");
    let touch = format!("touch {}", marker.display());

    let source = ScriptedSource::new(&[touch.as_str(), "exit"], Some(&marker));
    let seen = Rc::clone(&source.marker_seen);

    let mut shell = Shell::with_source(source, Config::new());
    shell.run().unwrap();

    assert_eq!(*seen.borrow(), vec![false, true]);
}

#[test]
fn test_background_does_not_block_the_prompt() {
    let source = ScriptedSource::new(&["sleep 5 #", "exit"], None);
    let prompts = Rc::clone(&source.prompts);

    let mut shell = Shell::with_source(source, Config::new());
    shell.run().unwrap();

    let prompts = prompts.borrow();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].duration_since(prompts[0]) < Duration::from_secs(5));

    // Still running when the loop ended; it is tracked, not forgotten.
    assert_eq!(shell.jobs().len(), 1);
    let pid = shell.jobs().iter().next().unwrap().pid();
    assert_eq!(shell.jobs().get(pid).unwrap().command(), "sleep 5");
    unsafe {
        libc::kill(pid, libc::SIGKILL);
    }
    let finished = shell.jobs_mut().wait_all();
    assert_eq!(finished[0].status, Some(ExitStatus::Signaled(libc::SIGKILL)));
}

#[test]
fn test_finished_background_jobs_are_reaped() {
    let mut shell = shell_over("true #\nsleep 0.3\n\nexit\n");
    shell.run().unwrap();
    assert!(shell.jobs().is_empty());
}

#[test]
fn test_external_dispatch_results() {
    let mut shell = shell_over("");

    match shell.execute_line("true") {
        Dispatch::External(Ok(Execution::Foreground(status))) => assert!(status.success()),
        other => panic!("unexpected dispatch {:?}", other),
    }

    match shell.execute_line("husk-test-no-such-program arg") {
        Dispatch::External(Ok(Execution::Foreground(status))) => {
            assert_eq!(status.code(), Some(EXEC_FAILURE_STATUS));
        }
        other => panic!("unexpected dispatch {:?}", other),
    }
    assert!(shell.state().is_running());
}

#[test]
#[serial]
fn test_cd_changes_directory_for_later_commands() {
    env::set_current_dir(env::temp_dir()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().canonicalize().unwrap();

    let input = format!("chdir {}\ntouch relative-marker\nexit\n", target.display());
    let mut shell = shell_over(&input);
    shell.run().unwrap();

    assert_eq!(env::current_dir().unwrap().canonicalize().unwrap(), target);
    assert!(target.join("relative-marker").exists());
    env::set_current_dir(env::temp_dir()).unwrap();
}

#[test]
#[serial]
fn test_cd_failure_keeps_the_loop_running() {
    env::set_current_dir(env::temp_dir()).unwrap();
    let before = env::current_dir().unwrap();

    let mut shell = shell_over("");
    let dispatch = shell.execute_line("cd /nonexistent/husk/dir");

    assert!(matches!(dispatch, Dispatch::Builtin(BuiltinOutcome::Failed(_))));
    assert!(shell.state().is_running());
    assert_eq!(env::current_dir().unwrap(), before);

    let mut shell = shell_over("cd /nonexistent/husk/dir\nexit\n");
    assert!(shell.run().is_ok());
}

#[test]
fn test_status_and_job_notices_are_reported() {
    let output = run_reporting("false\ntrue #\nsleep 0.3\n\nexit\n", Config::new());

    assert!(output.contains("Process exited with status: exit code 1"), "{}", output);
    assert_eq!(output.matches("] Done (exit code 0)  true").count(), 1, "{}", output);
}

#[test]
fn test_quiet_hides_status_and_job_notices() {
    let mut config = Config::new();
    config.set("quiet", "true").unwrap();

    let output = run_reporting("false\ntrue #\nsleep 0.3\n\nexit\n", config);
    assert_eq!(output, "");
}
