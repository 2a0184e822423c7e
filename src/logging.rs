use env_logger::{Builder, Env};

/// Environment variable that overrides the log filter, e.g. `HUSK_LOG=trace`.
pub const LOG_ENV: &str = "HUSK_LOG";

/// Installs the `env_logger` backend. Records go to stderr so they never mix
/// into a command's stdout.
pub fn init(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };

    let _ = Builder::from_env(Env::new().filter_or(LOG_ENV, default_filter))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
