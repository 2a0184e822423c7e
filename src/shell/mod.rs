use std::io::{self, Write};

use crate::{
    core::{
        commands::{BuiltinDispatcher, BuiltinOutcome},
        config::Config,
        parser::Command,
        state::ShellState,
    },
    error::ShellError,
    highlight::SyntaxHighlighter,
    input::{EditorSource, LineSource, ReadOutcome, ShellCompleter},
    process::{Execution, JobTable, ProcessError, ProcessExecutor},
};

/// Where one input line ended up.
#[derive(Debug)]
pub enum Dispatch {
    /// Blank line or nothing left after parsing; nothing ran.
    Skipped,
    Builtin(BuiltinOutcome),
    External(Result<Execution, ProcessError>),
}

/// The read–eval loop: prompt, read, parse, run a builtin or spawn, repeat.
pub struct Shell<S: LineSource> {
    source: S,
    config: Config,
    state: ShellState,
    builtins: BuiltinDispatcher,
    executor: ProcessExecutor,
    jobs: JobTable,
    highlighter: SyntaxHighlighter,
    output: Box<dyn Write>,
}

impl Shell<EditorSource> {
    /// Shell reading from the terminal through the line editor.
    pub fn interactive(config: Config) -> Result<Self, ShellError> {
        let builtins = BuiltinDispatcher::new();
        let highlighter = SyntaxHighlighter::new();
        let source = EditorSource::new(ShellCompleter::new(builtins.names(), highlighter))?;

        let mut shell = Self::with_source(source, config);
        shell.highlighter = highlighter;
        Ok(shell)
    }
}

impl<S: LineSource> Shell<S> {
    pub fn with_source(source: S, config: Config) -> Self {
        Shell {
            source,
            config,
            state: ShellState::new(),
            builtins: BuiltinDispatcher::new(),
            executor: ProcessExecutor::new(),
            jobs: JobTable::new(),
            highlighter: SyntaxHighlighter::plain(),
            output: Box::new(io::stdout()),
        }
    }

    /// Sends status lines and job notices to `output` instead of stdout.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Reap background jobs only after a `SIGCHLD` instead of polling on
    /// every prompt.
    pub fn watch_children(&mut self) -> Result<(), ShellError> {
        self.jobs.watch_child_signals()?;
        Ok(())
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn jobs_mut(&mut self) -> &mut JobTable {
        &mut self.jobs
    }

    /// Runs until `exit`/`quit`. Running out of input is an error.
    pub fn run(&mut self) -> Result<(), ShellError> {
        while self.state.is_running() {
            self.report_finished_jobs();

            let line = match self.source.read_line(self.config.prompt())? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => return Err(ShellError::InputClosed),
            };

            if line.is_empty() {
                continue;
            }
            self.execute_line(&line);
        }

        self.report_finished_jobs();
        if !self.jobs.is_empty() {
            log::debug!("leaving {} background job(s) running", self.jobs.len());
        }
        Ok(())
    }

    /// Parses and runs a single line that has already had its terminator
    /// removed.
    pub fn execute_line(&mut self, line: &str) -> Dispatch {
        let command = Command::parse(line);
        if command.is_empty() {
            log::debug!("nothing to run in {:?}", line);
            return Dispatch::Skipped;
        }

        let outcome = self.builtins.dispatch(&command, &mut self.state);
        if outcome.is_builtin() {
            if let BuiltinOutcome::Failed(e) = &outcome {
                self.report_error(&e.to_string());
            }
            return Dispatch::Builtin(outcome);
        }

        log::debug!("spawning {:?} (background: {})", command.args(), command.is_background());
        let result = self.executor.execute(&command, &mut self.jobs);
        match &result {
            Ok(Execution::Foreground(status)) if !status.success() && !self.config.quiet() => {
                self.report(&format!("Process exited with status: {}", status));
            }
            Err(e) => self.report_error(&format!("husk: {}", e)),
            Ok(_) => {}
        }
        Dispatch::External(result)
    }

    fn report_finished_jobs(&mut self) {
        let notify = self.config.notify_jobs();
        for finished in self.jobs.reap() {
            if notify {
                let notice = self.highlighter.highlight_notice(&finished.to_string());
                self.report(&notice);
            }
        }
    }

    fn report(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", message).and_then(|_| self.output.flush()) {
            log::debug!("writing report: {}", e);
        }
    }

    fn report_error(&self, message: &str) {
        eprintln!("{}", self.highlighter.highlight_error(message));
    }
}
