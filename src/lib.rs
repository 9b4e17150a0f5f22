#![warn(missing_docs)]
#![warn(clippy::all)]

//! utilkit - leveled loggers and a retry executor for application code
//!
//! This library provides two independent utilities:
//!
//! - [`retry::Retry`] runs a fallible operation, synchronous or asynchronous, until it
//!   succeeds or its attempt budget is spent, waiting with optional exponential
//!   backoff between failures. The outcome is always a `Result`; operation errors
//!   and panics never escape.
//! - [`logger`] offers console and file loggers with `log`, `warn`, `error` and
//!   `trace` levels, each returning a `Result` instead of panicking.
//!
//! ## Usage
//! ```rust,no_run
//! use utilkit::logger::{ConsoleLogger, Logger};
//! use utilkit::retry::{Retry, RetryOptions};
//!
//! # async fn ping() -> Result<u16, std::io::Error> { Ok(200) }
//! # async fn example() -> utilkit::Result<()> {
//! let logger = ConsoleLogger::default();
//! let retry = Retry::new(RetryOptions::new().max_attempts(3).base_delay_ms(200))?;
//!
//! match retry.execute(|| ping()).await {
//!     Ok(status) => logger.log([format!("service answered {}", status)])?,
//!     Err(e) => logger.error([format!("service unreachable: {}", e.message())])?,
//! }
//! # Ok(())
//! # }
//! ```

/// Configuration loading
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Console and file loggers
pub mod logger;
/// Diagnostic logging setup
pub mod logging;
/// Retry executor with backoff
pub mod retry;

// Re-export common types
pub use config::Config;
pub use error::{Result, UtilsError};
pub use logger::{ConsoleLogger, FileLogger, Logger, LoggerOptions, FileLoggerOptions, LogType};
pub use retry::{NormalizedError, Retry, RetryError, RetryOptions, RetryPolicy};
