use env_logger::{Builder, Env};

/// Environment variable holding the log filter, e.g. `NOTECMD_LOG=debug`
pub const LOG_ENV: &str = "NOTECMD_LOG";

/// Log to stderr, warnings and above unless `NOTECMD_LOG` says otherwise
pub fn init_logging() {
    Builder::from_env(Env::new().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
