use crate::error::{Result, UtilsError};
use crate::logger::{palette, LogType};
use chrono::Local;
use env_logger::{Builder, Env};
use log::{self, Level, LevelFilter};
use std::io::Write;
use yansi::Paint;

/// Environment variable overriding the diagnostic log level
pub const LOG_ENV: &str = "UTILKIT_LOG";

/// Environment variable controlling colour in diagnostic output (`auto`, `always`, `never`)
pub const LOG_STYLE_ENV: &str = "UTILKIT_LOG_STYLE";

/// Initializes diagnostic logging for the library and CLI with the given level
///
/// Valid log levels are: error, warn, info, debug, trace. Calling this more than
/// once returns an error instead of replacing the installed logger.
pub fn init(log_level: &str) -> Result<()> {
    let env = Env::default()
        .filter_or(LOG_ENV, log_level)
        .write_style_or(LOG_STYLE_ENV, "auto");

    if std::env::var(LOG_STYLE_ENV).map_or(false, |style| style.eq_ignore_ascii_case("never")) {
        Paint::disable();
    }

    Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{}", format_log(record)))
        .try_init()
        .map_err(|e| UtilsError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Palette shade used for a diagnostic level
fn shade(level: Level) -> LogType {
    match level {
        Level::Error => LogType::Error,
        Level::Warn => LogType::Warn,
        Level::Info => LogType::Log,
        Level::Debug | Level::Trace => LogType::Trace,
    }
}

/// Formats a log record as `[timestamp][LEVEL][target]: message`
///
/// The level tag takes the console logger's colour for the matching log type.
pub fn format_log(record: &log::Record) -> String {
    let tag = format!("[{}]", record.level());
    let target = match record.target() {
        "" => record.module_path().unwrap_or("unknown"),
        target => target,
    };

    format!(
        "[{}]{}[{}]: {}",
        Local::now().format("%d-%m-%Y %H:%M:%S%.3f"),
        palette::paint(shade(record.level()), tag),
        target,
        record.args()
    )
}

/// Parses a log level string into a `LevelFilter`, defaulting to `Info`
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
