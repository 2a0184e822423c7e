use std::env;
use std::path::PathBuf;

const RC_FILE: &str = ".huskrc";

/// Where settings are read from. An explicit path must exist; the default
/// `~/.huskrc` is optional.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: Option<PathBuf>,
    pub required: bool,
}

impl ConfigPaths {
    pub fn new(explicit: Option<&str>) -> Self {
        match explicit {
            Some(path) => ConfigPaths {
                rc_path: Some(PathBuf::from(path)),
                required: true,
            },
            None => ConfigPaths {
                rc_path: env::var_os("HOME")
                    .map(PathBuf::from)
                    .or_else(dirs::home_dir)
                    .map(|home| home.join(RC_FILE)),
                required: false,
            },
        }
    }
}
