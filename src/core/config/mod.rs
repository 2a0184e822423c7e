use std::fmt;

mod loader;
mod paths;

use crate::flags::Flags;
use loader::ConfigLoader;
pub use paths::ConfigPaths;

pub const DEFAULT_PROMPT: &str = "husk: ";

/// Interpreter settings. Defaults, then the rc file, then command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    prompt: String,
    quiet: bool,
    notify_jobs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            quiet: false,
            notify_jobs: true,
        }
    }

    pub fn load(flags: &Flags) -> Result<Self, ConfigError> {
        let mut config = Config::new();
        let paths = ConfigPaths::new(flags.get_value("config").map(String::as_str));
        ConfigLoader::new(&paths).load_configs(&mut config)?;
        config.apply_flags(flags);
        Ok(config)
    }

    pub fn apply_flags(&mut self, flags: &Flags) {
        if let Some(prompt) = flags.get_value("prompt") {
            self.prompt = prompt.clone();
        }
        if flags.is_set("quiet") {
            self.quiet = true;
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "prompt" => self.prompt = value.to_string(),
            "quiet" => self.quiet = parse_bool(key, value)?,
            "notify_jobs" => self.notify_jobs = parse_bool(key, value)?,
            _ => log::warn!("ignoring unknown setting '{}'", key),
        }
        Ok(())
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn notify_jobs(&self) -> bool {
        self.notify_jobs && !self.quiet
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound(String),
    InvalidLine { line: usize, content: String },
    InvalidValue { key: String, value: String },
    IoError(std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::InvalidLine { line, content } => {
                write!(f, "line {}: expected key = value, got '{}'", line, content)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for '{}'", value, key)
            }
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
