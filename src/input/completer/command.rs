use std::{collections::BTreeSet, env, fs};

use rustyline::completion::Pair;

/// Completes the first word from the builtin names and every executable
/// found on `PATH`.
#[derive(Clone, Default)]
pub struct CommandCompleter {
    commands: BTreeSet<String>,
}

impl CommandCompleter {
    pub fn new<'a>(builtins: impl IntoIterator<Item = &'a str>) -> Self {
        let mut completer = Self::default();
        completer.commands.extend(builtins.into_iter().map(String::from));
        completer.add_path_commands();
        completer
    }

    fn add_path_commands(&mut self) {
        let Some(path_var) = env::var_os("PATH") else {
            return;
        };

        for dir in env::split_paths(&path_var) {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let is_candidate = entry
                    .file_type()
                    .map(|t| t.is_file() || t.is_symlink())
                    .unwrap_or(false);
                if let (true, Some(name)) = (is_candidate, entry.file_name().to_str()) {
                    self.commands.insert(name.to_string());
                }
            }
        }
    }

    pub fn complete_command(&self, prefix: &str) -> Vec<Pair> {
        self.commands
            .range(prefix.to_string()..)
            .take_while(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}
