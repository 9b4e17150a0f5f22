use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UtilsError};
use crate::logger::{ConsoleLogger, FileLogger, FileLoggerOptions, LoggerOptions};
use crate::logging::LOG_ENV;
use crate::retry::{Retry, RetryOptions};

/// Main configuration struct for the library and CLI
///
/// Every section is optional in the TOML file; missing values take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry policy for the shared executor
    pub retry: RetryOptions,
    /// Console logger settings
    pub console: LoggerOptions,
    /// File logger settings
    pub file: FileLoggerOptions,
    /// Level for the library's own diagnostic output
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry: RetryOptions::default(),
            console: LoggerOptions::default(),
            file: FileLoggerOptions::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location
    ///
    /// If the config file doesn't exist, returns the default configuration.
    /// The `UTILKIT_LOG` environment variable overrides `log_level`.
    pub fn load() -> Result<Self> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Location of the user config file, `<config dir>/utilkit/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("utilkit").join("config.toml"))
    }

    /// Reads configuration from a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            UtilsError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured retry policy is usable
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == Some(0) {
            return Err(UtilsError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var(LOG_ENV) {
            if !level.trim().is_empty() {
                self.log_level = level;
            }
        }
        self
    }

    /// Builds a retry executor from the `retry` section
    pub fn retry(&self) -> Result<Retry> {
        Ok(Retry::new(self.retry)?)
    }

    /// Builds a console logger from the `console` section
    pub fn console_logger(&self) -> ConsoleLogger {
        ConsoleLogger::new(self.console.clone())
    }

    /// Builds a file logger from the `file` section
    pub fn file_logger(&self) -> Result<FileLogger> {
        FileLogger::new(self.file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() -> Result<()> {
        let config = Config::from_toml_str("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.retry()?.policy(), &RetryPolicy::DEFAULT);
        Ok(())
    }

    #[test]
    fn test_partial_sections() -> Result<()> {
        let config = Config::from_toml_str(
            r#"
            log_level = "debug"

            [retry]
            max_attempts = 6
            exponential = false

            [console]
            time_enabled = true
            "#,
        )?;

        let policy = *config.retry()?.policy();
        assert_eq!(
            policy,
            RetryPolicy {
                base_delay_ms: 125,
                max_attempts: 6,
                exponential: false,
            }
        );
        assert!(config.console.time_enabled);
        assert!(!config.file.logger.time_enabled);
        assert_eq!(config.log_level, "debug");
        Ok(())
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Config::from_toml_str("[retry]\nmax_attempts = 0");
        assert!(matches!(result, Err(UtilsError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml_str("retry = 3");
        assert!(matches!(result, Err(UtilsError::Toml(_))));
    }

    #[test]
    fn test_from_path_and_file_logger() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let log_path = temp_dir.path().join("nested").join("app.log");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!("[file]\nlog_file_path = {:?}\n", log_path.to_string_lossy()),
        )?;

        let config = Config::from_path(&config_path)?;
        let logger = config.file_logger()?;
        assert_eq!(logger.path(), log_path.as_path());
        assert!(temp_dir.path().join("nested").is_dir());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(UtilsError::Config(_))));
    }
}
