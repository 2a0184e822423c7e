use std::collections::BTreeMap;
use std::path::PathBuf;

mod cd;
mod exit;

pub use cd::CdCommand;
pub use exit::ExitCommand;

use super::parser::Command;
use super::state::ShellState;

#[derive(Debug)]
pub enum CommandError {
    ChangeDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    HomeDirNotFound,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::ChangeDirectory { path, source } => {
                write!(f, "cd: {}: {}", path.display(), source)
            }
            CommandError::HomeDirNotFound => write!(f, "cd: home directory not found"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::ChangeDirectory { source, .. } => Some(source),
            CommandError::HomeDirNotFound => None,
        }
    }
}

/// What the dispatcher did with a command.
#[derive(Debug)]
pub enum BuiltinOutcome {
    /// Not a builtin; nothing was touched.
    NotBuiltin,
    Handled,
    /// A builtin ran and failed. The command must still not be spawned.
    Failed(CommandError),
}

impl BuiltinOutcome {
    pub fn is_builtin(&self) -> bool {
        !matches!(self, BuiltinOutcome::NotBuiltin)
    }
}

/// A command that runs inside the interpreter because it mutates its state.
pub trait Builtin {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<(), CommandError>;
}

#[derive(Clone)]
enum BuiltinType {
    Cd(CdCommand),
    Exit(ExitCommand),
}

impl Builtin for BuiltinType {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<(), CommandError> {
        match self {
            BuiltinType::Cd(cmd) => cmd.execute(args, state),
            BuiltinType::Exit(cmd) => cmd.execute(args, state),
        }
    }
}

/// Intercepts the fixed builtin vocabulary before anything is spawned.
#[derive(Clone)]
pub struct BuiltinDispatcher {
    commands: BTreeMap<&'static str, BuiltinType>,
}

impl Default for BuiltinDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinDispatcher {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();

        commands.insert("exit", BuiltinType::Exit(ExitCommand::new()));
        commands.insert("quit", BuiltinType::Exit(ExitCommand::new()));
        commands.insert("cd", BuiltinType::Cd(CdCommand::new()));
        commands.insert("chdir", BuiltinType::Cd(CdCommand::new()));

        Self { commands }
    }

    pub fn dispatch(&self, command: &Command, state: &mut ShellState) -> BuiltinOutcome {
        let Some(builtin) = command.program().and_then(|name| self.commands.get(name)) else {
            return BuiltinOutcome::NotBuiltin;
        };

        match builtin.execute(command.operands(), state) {
            Ok(()) => BuiltinOutcome::Handled,
            Err(e) => BuiltinOutcome::Failed(e),
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn setup() -> (BuiltinDispatcher, ShellState) {
        (BuiltinDispatcher::new(), ShellState::new())
    }

    #[test]
    fn test_exit_and_quit_stop_the_loop() {
        for line in ["exit", "quit", "exit 3", "quit now please"] {
            let (dispatcher, mut state) = setup();
            let outcome = dispatcher.dispatch(&Command::parse(line), &mut state);
            assert!(matches!(outcome, BuiltinOutcome::Handled), "{}", line);
            assert!(!state.is_running(), "{}", line);
        }
    }

    #[test]
    #[serial]
    fn test_cd_and_chdir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();

        for name in ["cd", "chdir"] {
            let (dispatcher, mut state) = setup();
            env::set_current_dir("/").unwrap();

            let line = format!("{} {}", name, target.display());
            let outcome = dispatcher.dispatch(&Command::parse(&line), &mut state);

            assert!(matches!(outcome, BuiltinOutcome::Handled));
            assert_eq!(env::current_dir().unwrap().canonicalize().unwrap(), target);
            assert!(state.is_running());
        }
    }

    #[test]
    #[serial]
    fn test_cd_failure_is_handled_not_passed_through() {
        env::set_current_dir(env::temp_dir()).unwrap();
        let (dispatcher, mut state) = setup();
        let command = Command::parse("cd /path/that/does/not/exist");
        let outcome = dispatcher.dispatch(&command, &mut state);

        assert!(outcome.is_builtin());
        match outcome {
            BuiltinOutcome::Failed(e) => {
                let message = e.to_string();
                assert!(message.starts_with("cd: /path/that/does/not/exist: "));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(state.is_running());
    }

    #[test]
    fn test_unknown_commands_are_not_builtins() {
        for line in ["ls -la", "Exit", "EXIT", "ex", "cdd /tmp", "echo exit", "exit2"] {
            let (dispatcher, mut state) = setup();
            let outcome = dispatcher.dispatch(&Command::parse(line), &mut state);
            assert!(matches!(outcome, BuiltinOutcome::NotBuiltin), "{}", line);
            assert!(state.is_running());
        }
    }

    #[test]
    fn test_empty_command_is_not_a_builtin() {
        let (dispatcher, mut state) = setup();
        let outcome = dispatcher.dispatch(&Command::parse("#"), &mut state);
        assert!(matches!(outcome, BuiltinOutcome::NotBuiltin));
    }

    #[test]
    fn test_builtin_detection() {
        let dispatcher = BuiltinDispatcher::new();

        assert!(dispatcher.is_builtin("cd"));
        assert!(dispatcher.is_builtin("chdir"));
        assert!(dispatcher.is_builtin("exit"));
        assert!(dispatcher.is_builtin("quit"));
        assert!(!dispatcher.is_builtin("source"));
        assert!(!dispatcher.is_builtin(""));
        assert_eq!(
            dispatcher.names().collect::<Vec<_>>(),
            vec!["cd", "chdir", "exit", "quit"]
        );
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::ChangeDirectory {
                path: PathBuf::from("/nope"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            },
            CommandError::HomeDirNotFound,
        ];

        for error in errors {
            assert!(error.to_string().starts_with("cd: "));
        }
    }
}
