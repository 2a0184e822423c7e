use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

/// Completes filesystem paths relative to the current directory.
#[derive(Clone, Default)]
pub struct PathCompleter;

impl PathCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (dir, prefix) = split_incomplete(incomplete);
        let search = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir.as_path()
        };
        let Ok(entries) = fs::read_dir(search) else {
            return Vec::new();
        };

        let mut matches: Vec<Pair> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !name.starts_with(&prefix) {
                    return None;
                }
                let shown = dir.join(&name).to_string_lossy().into_owned();
                Some(if entry.path().is_dir() {
                    Pair {
                        display: format!("{}/", shown),
                        replacement: format!("{}/", shown),
                    }
                } else {
                    Pair {
                        replacement: format!("{} ", shown),
                        display: shown,
                    }
                })
            })
            .collect();

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }
}

/// `"src/ma"` → (`"src"`, `"ma"`); `"src/"` → (`"src/"`, `""`); `"ma"` → (`""`, `"ma"`).
fn split_incomplete(incomplete: &str) -> (PathBuf, String) {
    if incomplete.is_empty() || incomplete.ends_with('/') {
        return (PathBuf::from(incomplete), String::new());
    }

    let path = Path::new(incomplete);
    let prefix = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    (dir, prefix)
}
