use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{FileLoggerOptions, LogType, Logger, LoggerOptions};
use crate::error::Result;

/// Logger appending plain, uncoloured messages to a file
#[derive(Debug, Clone)]
pub struct FileLogger {
    options: LoggerOptions,
    log_file_path: PathBuf,
}

impl FileLogger {
    /// Creates the logger, creating the log file's directory if it is missing
    pub fn new(options: FileLoggerOptions) -> Result<Self> {
        let log_file_path = options.log_file_path.unwrap_or_else(default_log_path);
        let logger = Self {
            options: options.logger,
            log_file_path,
        };
        logger.create_folder()?;
        Ok(logger)
    }

    /// Path of the file messages are appended to
    pub fn path(&self) -> &Path {
        &self.log_file_path
    }

    fn create_folder(&self) -> Result<()> {
        if let Some(directory) = self.log_file_path.parent() {
            if !directory.as_os_str().is_empty() && !directory.exists() {
                fs::create_dir_all(directory)?;
            }
        }
        Ok(())
    }
}

impl Logger for FileLogger {
    fn options(&self) -> &LoggerOptions {
        &self.options
    }

    fn write_message(&self, _log_type: LogType, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)?;
        file.write_all(message.as_bytes())?;
        Ok(())
    }
}

fn default_log_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("logs")
        .join("my-log.log")
}
