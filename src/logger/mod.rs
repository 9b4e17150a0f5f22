//! Leveled loggers writing to the console or to a file
//!
//! Every logger entry point returns a [`Result`](crate::error::Result) instead of
//! panicking when the message cannot be formatted or written.
//!
//! ```rust,no_run
//! use utilkit::logger::{ConsoleLogger, Logger, LoggerOptions};
//!
//! let logger = ConsoleLogger::new(LoggerOptions { time_enabled: true, ..Default::default() });
//! if let Err(e) = logger.warn(["disk usage at", "91%"]) {
//!     eprintln!("could not log: {}", e);
//! }
//! ```

mod console;
mod file;
pub mod palette;

pub use console::ConsoleLogger;
pub use file::FileLogger;

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, UtilsError};

/// Default timestamp format, day-month-year then time
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    /// Regular output
    Log,
    /// Warnings
    Warn,
    /// Errors
    Error,
    /// Diagnostic tracing
    Trace,
}

impl LogType {
    /// All log types in severity display order
    pub const ALL: [LogType; 4] = [LogType::Log, LogType::Warn, LogType::Error, LogType::Trace];

    /// Upper-case label written in the message prefix
    pub fn label(&self) -> &'static str {
        match self {
            LogType::Log => "LOG",
            LogType::Warn => "WARN",
            LogType::Error => "ERROR",
            LogType::Trace => "TRACE",
        }
    }

    /// Lower-case name, as used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            LogType::Log => "log",
            LogType::Warn => "warn",
            LogType::Error => "error",
            LogType::Trace => "trace",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogType {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(LogType::Log),
            "warn" => Ok(LogType::Warn),
            "error" => Ok(LogType::Error),
            "trace" => Ok(LogType::Trace),
            other => Err(UtilsError::Message(format!("Unknown log type: {}", other))),
        }
    }
}

/// One fragment of a log message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogItem {
    /// Plain text
    Text(String),
    /// A rendered error with its cause chain
    Error(String),
}

impl LogItem {
    /// Renders an error and its sources as `message: cause: cause`
    pub fn error<E>(error: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        let mut rendered = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            rendered.push_str(": ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        LogItem::Error(rendered)
    }

    /// Text written for this fragment
    pub fn as_str(&self) -> &str {
        match self {
            LogItem::Text(text) | LogItem::Error(text) => text,
        }
    }
}

impl From<&str> for LogItem {
    fn from(text: &str) -> Self {
        LogItem::Text(text.to_string())
    }
}

impl From<String> for LogItem {
    fn from(text: String) -> Self {
        LogItem::Text(text)
    }
}

impl From<&String> for LogItem {
    fn from(text: &String) -> Self {
        LogItem::Text(text.clone())
    }
}

/// Options shared by all loggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Prefix every message with a timestamp
    pub time_enabled: bool,
    /// `chrono` format string for the timestamp
    pub date_format: String,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            time_enabled: false,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Options for [`FileLogger`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggerOptions {
    /// Formatting options
    #[serde(flatten)]
    pub logger: LoggerOptions,
    /// Target file; defaults to `logs/my-log.log` under the working directory
    pub log_file_path: Option<PathBuf>,
}

/// A leveled logger
///
/// Implementors provide the sink; formatting and the level entry points are shared.
pub trait Logger: Send + Sync {
    /// Formatting options of this logger
    fn options(&self) -> &LoggerOptions;

    /// Writes an already formatted message to the sink
    fn write_message(&self, log_type: LogType, message: &str) -> Result<()>;

    /// Formats `content` and writes it at the given level
    fn log_message(&self, log_type: LogType, content: &[LogItem]) -> Result<()> {
        let message = self.format_message(log_type, content)?;
        self.write_message(log_type, &message)
    }

    /// Builds `[timestamp][LABEL]: item item\n`, the timestamp only when enabled
    fn format_message(&self, log_type: LogType, content: &[LogItem]) -> Result<String> {
        let options = self.options();
        let mut message = String::new();

        if options.time_enabled {
            write!(message, "[{}]", Local::now().format(&options.date_format)).map_err(|_| {
                UtilsError::Format(format!("invalid date format '{}'", options.date_format))
            })?;
        }

        let body = content
            .iter()
            .map(LogItem::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        message.push_str(&format!("[{}]: {}\n", log_type.label(), body));

        Ok(message)
    }

    /// Logs at `log` level
    fn log<I, S>(&self, content: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<LogItem>,
    {
        self.log_message(LogType::Log, &collect_items(content))
    }

    /// Logs at `warn` level
    fn warn<I, S>(&self, content: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<LogItem>,
    {
        self.log_message(LogType::Warn, &collect_items(content))
    }

    /// Logs at `error` level
    fn error<I, S>(&self, content: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<LogItem>,
    {
        self.log_message(LogType::Error, &collect_items(content))
    }

    /// Logs at `trace` level
    fn trace<I, S>(&self, content: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<LogItem>,
    {
        self.log_message(LogType::Trace, &collect_items(content))
    }
}

fn collect_items<I, S>(content: I) -> Vec<LogItem>
where
    I: IntoIterator<Item = S>,
    S: Into<LogItem>,
{
    content.into_iter().map(Into::into).collect()
}
