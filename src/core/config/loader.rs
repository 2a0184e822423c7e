use std::{fs, path::Path};

use super::{Config, ConfigError, ConfigPaths};

pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn load_configs(&self, config: &mut Config) -> Result<(), ConfigError> {
        let Some(path) = &self.paths.rc_path else {
            return Ok(());
        };

        if path.exists() {
            self.source(path, config)
        } else if self.paths.required {
            Err(ConfigError::ConfigFileNotFound(path.display().to_string()))
        } else {
            Ok(())
        }
    }

    fn source(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        log::debug!("loading settings from {}", path.display());
        let content = fs::read_to_string(path)?;
        for (index, line) in content.lines().enumerate() {
            self.process_line(index + 1, line, config)?;
        }
        Ok(())
    }

    fn process_line(
        &self,
        number: usize,
        line: &str,
        config: &mut Config,
    ) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::InvalidLine {
            line: number,
            content: line.to_string(),
        })?;

        config.set(key.trim(), unquote(value.trim()))
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
