#![cfg(feature = "std")]

//! Stderr backend for the `log` facade. Stdout stays free for JSON output.

use std::env;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the level for this crate's records.
pub const LOG_ENV: &str = "BROADSIDE_LOG";

struct StderrLogger {
    started: Instant,
    /// Level for `broadside` targets; everything else is held to `Warn`.
    level: LevelFilter,
}

impl StderrLogger {
    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(env!("CARGO_CRATE_NAME")) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.elapsed();
        eprintln!(
            "[{:>4}.{:03}s {:<5} {}] {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Parse a level name, falling back to `Info` for missing or unknown values.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the stderr logger at the level named by `BROADSIDE_LOG`.
/// Calling it again after a logger is installed does nothing.
pub fn init_logging() {
    let level = level_from(env::var(LOG_ENV).ok().as_deref());
    let logger = StderrLogger {
        started: Instant::now(),
        level,
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
