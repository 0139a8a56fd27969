//! Stderr logger behind the `log` facade.
//!
//! Level comes from `-v` (repeatable). Without `-v`, `FUELPRINT_LOG` is read
//! (`off`, `error`, `warn`, `info`, `debug`, `trace`); the fallback is `error`.

use log::{Level, LevelFilter, Log, Metadata, Record};

pub const LOG_ENV: &str = "FUELPRINT_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", level_tag(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warn",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

/// Map a `-v` count (and the env fallback) to a level filter.
pub fn level_for(verbose: u8, env_value: Option<&str>) -> LevelFilter {
    match verbose {
        0 => env_value
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(LevelFilter::Error),
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. A second call is a no-op.
pub fn init(verbose: u8) {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = level_for(verbose, env_value.as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
