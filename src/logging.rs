//! # Logging Bootstrap
//!
//! The crate logs through the `log` facade everywhere; this helper wires a
//! file-backed `simplelog` writer for embedding applications and demos that
//! don't bring their own logger.

use std::fs::File;
use std::path::Path;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Initialize a file logger with RFC-3339 timestamps at debug level.
///
/// Fails if a global logger is already installed or the file cannot be
/// created; both are reported as `io::Error` so callers can log-and-continue.
pub fn init_file_logger(path: &Path) -> std::io::Result<()> {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let file = File::create(path)?;
    WriteLogger::init(LevelFilter::Debug, config, file)
        .map_err(|e| std::io::Error::other(e.to_string()))
}
