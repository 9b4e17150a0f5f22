use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use utilkit::logger::{FileLogger, FileLoggerOptions, LogItem, LogType, Logger, LoggerOptions};
use utilkit::retry::{Retry, RetryOptions};

#[test]
fn test_file_logger_with_timestamps() {
    let dir = TempDir::new().unwrap();
    let logger = FileLogger::new(FileLoggerOptions {
        logger: LoggerOptions {
            time_enabled: true,
            date_format: "%Y-%m-%d".to_string(),
        },
        log_file_path: Some(dir.path().join("logs").join("app.log")),
    })
    .unwrap();

    logger.log(["first"]).unwrap();
    logger.trace(["second", "part"]).unwrap();

    let contents = fs::read_to_string(logger.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("][LOG]: first"));
    assert!(lines[1].ends_with("][TRACE]: second part"));
}

#[test]
fn test_concurrent_file_writes_keep_lines_intact() {
    let dir = TempDir::new().unwrap();
    let logger = Arc::new(
        FileLogger::new(FileLoggerOptions {
            log_file_path: Some(dir.path().join("shared.log")),
            ..Default::default()
        })
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..25 {
                    logger.log([format!("worker {} line {}", worker, i)]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let contents = fs::read_to_string(logger.path()).unwrap();
    assert_eq!(contents.lines().count(), 100);
    assert!(contents.lines().all(|line| line.starts_with("[LOG]: worker ")));
}

#[tokio::test]
async fn test_logging_retry_failure() {
    let dir = TempDir::new().unwrap();
    let logger = FileLogger::new(FileLoggerOptions {
        log_file_path: Some(dir.path().join("retry.log")),
        ..Default::default()
    })
    .unwrap();
    let retry = Retry::new(RetryOptions::new().max_attempts(2).base_delay_ms(1)).unwrap();

    let result: Result<(), _> = retry.execute_sync(|| Err("boom")).await;
    let error = result.unwrap_err();
    logger
        .log_message(LogType::Error, &["retry gave up:".into(), LogItem::error(&error)])
        .unwrap();

    let contents = fs::read_to_string(logger.path()).unwrap();
    assert_eq!(contents, "[ERROR]: retry gave up: retry exhausted after 2 attempts: boom\n");
}
