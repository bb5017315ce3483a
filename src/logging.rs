//! File-backed `env_logger` setup.
//!
//! The terminal is in raw alternate-screen mode while the game runs, so records are
//! piped to a file instead of stderr. Without a configured path nothing is
//! installed and every `log` macro is a no-op.

use std::fs::OpenOptions;
use std::io::Write;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

use crate::config::LogConfig;
use crate::error::LogInitError;

/// Builder writing plain (uncolored) records with millisecond timestamps to `out`.
pub fn builder(level: LevelFilter, out: Box<dyn Write + Send>) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format_timestamp_millis()
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(out));
    builder
}

/// Install the file logger described by `config`.
///
/// Returns the effective level; `Off` means nothing was installed.
pub fn init(config: &LogConfig) -> Result<LevelFilter, LogInitError> {
    let level = config.level_filter();
    let Some(path) = config.path.as_ref().filter(|_| level != LevelFilter::Off) else {
        return Ok(LevelFilter::Off);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogInitError::Open {
            path: path.clone(),
            source,
        })?;

    builder(level, Box::new(file)).try_init()?;
    Ok(level)
}

/// Flush pending records; call before exit.
pub fn flush() {
    log::logger().flush();
}
