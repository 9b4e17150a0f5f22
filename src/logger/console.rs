use std::io::{self, Write};
use std::sync::Mutex;

use super::{palette, LogType, Logger, LoggerOptions};
use crate::error::{Result, UtilsError};

/// Logger printing coloured messages to the terminal
///
/// `log` goes to stdout; `warn`, `error` and `trace` go to stderr, unless a
/// writer was injected with [`ConsoleLogger::with_writer`].
pub struct ConsoleLogger {
    options: LoggerOptions,
    writer: Option<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleLogger {
    /// Creates a logger writing to the standard streams
    pub fn new(options: LoggerOptions) -> Self {
        Self {
            options,
            writer: None,
        }
    }

    /// Creates a logger sending every level to `writer`
    pub fn with_writer<W>(options: LoggerOptions, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            options,
            writer: Some(Mutex::new(Box::new(writer))),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LoggerOptions::default())
    }
}

/// Whether a level is written to stderr rather than stdout
fn uses_stderr(log_type: LogType) -> bool {
    match log_type {
        LogType::Log => false,
        LogType::Warn | LogType::Error | LogType::Trace => true,
    }
}

impl Logger for ConsoleLogger {
    fn options(&self) -> &LoggerOptions {
        &self.options
    }

    fn write_message(&self, log_type: LogType, message: &str) -> Result<()> {
        let line = palette::paint(log_type, message.trim_end_matches('\n'));

        match &self.writer {
            Some(writer) => {
                let mut writer = writer
                    .lock()
                    .map_err(|_| UtilsError::new("console writer lock poisoned"))?;
                writeln!(writer, "{}", line)?;
                writer.flush()?;
            }
            None if uses_stderr(log_type) => writeln!(io::stderr().lock(), "{}", line)?,
            None => writeln!(io::stdout().lock(), "{}", line)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogItem;
    use std::sync::Arc;
    use yansi::Paint;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_writes_colored_line() {
        let buffer = SharedBuffer::default();
        let logger = ConsoleLogger::with_writer(LoggerOptions::default(), buffer.clone());

        assert!(logger.log(["Hello, world!"]).is_ok());

        let output = buffer.contents();
        assert!(output.contains("[LOG]: Hello, world!"));
        assert!(output.ends_with('\n'));
        if Paint::is_enabled() {
            assert!(output.contains("38;2;248;248;242"));
        }
    }

    #[test]
    fn test_error_with_error_item() {
        let buffer = SharedBuffer::default();
        let logger = ConsoleLogger::with_writer(LoggerOptions::default(), buffer.clone());
        let error = io::Error::new(io::ErrorKind::Other, "Something went wrong!");

        assert!(logger
            .log_message(LogType::Error, &[LogItem::error(&error)])
            .is_ok());

        let output = buffer.contents();
        assert!(output.contains("[ERROR]: Something went wrong!"));
        if Paint::is_enabled() {
            assert!(output.contains("38;2;255;85;85"));
        }
    }

    #[test]
    fn test_stream_routing() {
        assert!(!uses_stderr(LogType::Log));
        assert!(uses_stderr(LogType::Warn));
        assert!(uses_stderr(LogType::Error));
        assert!(uses_stderr(LogType::Trace));
    }

    #[test]
    fn test_write_failure_is_returned() {
        let logger = ConsoleLogger::with_writer(LoggerOptions::default(), BrokenPipe);
        let result = logger.warn(["lost"]);
        assert!(matches!(result, Err(UtilsError::IO(_))));
    }
}
