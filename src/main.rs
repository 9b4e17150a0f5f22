use utilkit::{
    config::Config,
    logger::{ConsoleLogger, FileLogger, LogItem, LogType, Logger},
    logging,
    retry::{Retry, RetryOptions},
};
use anyhow::Context;
use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Parser)]
#[command(author, version, about = "Manual test console for the utilkit loggers and retry executor", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File used by the `file-log` command
    #[arg(short = 'f', long)]
    log_file: Option<PathBuf>,

    /// Prefix console messages with a timestamp
    #[arg(short, long)]
    time: bool,

    /// Diagnostic log level (error, warn, info, debug, trace)
    #[arg(short, long)]
    log_level: Option<String>,
}

/// A parsed REPL command
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Emit(LogType, String),
    FileLog(String),
    RetryTest(Option<String>),
    RetryConfig(Vec<String>),
    ColorTest,
    Interactive,
    Exit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let args: Vec<String> = parts.map(str::to_string).collect();
        let message = args.join(" ");

        let command = match name.to_lowercase().as_str() {
            "help" | "h" | "?" => Command::Help,
            "log" | "warn" | "error" | "trace" => match name.parse::<LogType>() {
                Ok(log_type) => Command::Emit(log_type, message),
                Err(_) => Command::Unknown(name.to_string()),
            },
            "file-log" => Command::FileLog(message),
            "retry-test" => Command::RetryTest(args.into_iter().next()),
            "retry-config" => Command::RetryConfig(args),
            "color-test" | "unified-color-test" => Command::ColorTest,
            "interactive" | "i" => Command::Interactive,
            "exit" | "quit" | "q" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

struct ManualTestCli {
    console: ConsoleLogger,
    file: Option<FileLogger>,
    retry: Retry,
    theme: ColorfulTheme,
}

impl ManualTestCli {
    fn new(config: &Config) -> anyhow::Result<Self> {
        let file = match config.file_logger() {
            Ok(logger) => Some(logger),
            Err(e) => {
                warn!("File logger unavailable: {}", e);
                None
            }
        };

        Ok(Self {
            console: config.console_logger(),
            file,
            retry: config.retry().context("invalid retry configuration")?,
            theme: ColorfulTheme::default(),
        })
    }

    fn say(&self, message: impl Into<String>) {
        let message: String = message.into();
        if let Err(e) = self.console.log([message]) {
            eprintln!("{} {}", "[ERROR]".bright_red(), e);
        }
    }

    async fn run(&self) {
        self.say("🚀 utilkit manual test console - type \"help\" for commands or \"exit\" to quit\n");

        loop {
            let line = Input::<String>::with_theme(&self.theme)
                .with_prompt("utilkit$")
                .validate_with(|input: &String| -> Result<(), &'static str> {
                    if input.trim().is_empty() {
                        Err("Please enter a command (or \"help\" for available commands)")
                    } else {
                        Ok(())
                    }
                })
                .interact_text();

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.say(format!("❌ Prompt error: {}", e));
                    break;
                }
            };

            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if command == Command::Exit {
                break;
            }
            self.handle(command).await;
            self.say("");
        }

        self.say("👋 Goodbye!");
    }

    async fn handle(&self, command: Command) {
        debug!("Handling command {:?}", command);
        let command = match command {
            Command::Interactive => match self.interactive() {
                Some(selected) => selected,
                None => return,
            },
            other => other,
        };

        match command {
            Command::Help => print_help(),
            Command::Emit(log_type, message) => self.emit(log_type, &message),
            Command::FileLog(message) => self.file_log(&message),
            Command::RetryTest(failures) => self.retry_test(failures.as_deref()).await,
            Command::RetryConfig(args) => self.retry_config(&args).await,
            Command::ColorTest => self.color_test(),
            Command::Interactive | Command::Exit => {}
            Command::Unknown(name) => {
                self.say(format!("❌ Unknown command: {}", name));
                self.say("💡 Type \"help\" to see available commands");
            }
        }
    }

    fn emit(&self, log_type: LogType, message: &str) {
        if message.is_empty() {
            self.say(format!("❌ Please provide a message to {}", log_type));
            return;
        }

        match self.console.log_message(log_type, &[message.into()]) {
            Ok(()) => self.say(format!("✅ Console {} success", log_type)),
            Err(e) => self.say(format!("❌ Console {} error: {}", log_type, e)),
        }
    }

    fn file_log(&self, message: &str) {
        if message.is_empty() {
            self.say("❌ Please provide a message to log to file");
            return;
        }

        let Some(file) = &self.file else {
            self.say("❌ File logger not available");
            return;
        };

        match file.log([message]) {
            Ok(()) => self.say(format!("📄 File log success ({})", file.path().display())),
            Err(e) => self.say(format!("❌ File log error: {}", e)),
        }
    }

    async fn retry_test(&self, failures: Option<&str>) {
        let failures = match parse_count(failures, 2) {
            Some(n) => n,
            None => {
                self.say("❌ Invalid failure count. Use: retry-test [number]");
                return;
            }
        };

        self.say(format!("🧪 Testing retry mechanism with {} initial failures...\n", failures));
        let attempts = AtomicU32::new(0);

        let result = self
            .retry
            .execute(|| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                self.say(format!("🔄 Attempt {}", attempt));
                async move {
                    if attempt <= failures {
                        Err(format!("Simulated failure on attempt {}", attempt))
                    } else {
                        Ok(format!("Success after {} attempts!", attempt))
                    }
                }
            })
            .await;

        match result {
            Ok(message) => self.say(format!("✅ {}", message)),
            Err(e) => self.say(format!("❌ Retry failed: {}", e.message())),
        }
    }

    async fn retry_config(&self, args: &[String]) {
        let max_attempts = parse_count(args.first().map(String::as_str), 3);
        let base_delay_ms = args
            .get(1)
            .map_or(Some(500), |arg| arg.parse::<u64>().ok());
        let exponential = args.get(2).map_or(true, |arg| arg != "false");

        let (Some(max_attempts), Some(base_delay_ms)) = (max_attempts, base_delay_ms) else {
            self.say("❌ Invalid arguments. Use: retry-config [attempts] [delay_ms] [exponential]");
            return;
        };

        self.say(format!(
            "🔧 Testing retry with: {} attempts, {}ms delay, exponential: {}\n",
            max_attempts, base_delay_ms, exponential
        ));

        let options = RetryOptions::new()
            .max_attempts(max_attempts)
            .base_delay_ms(base_delay_ms)
            .exponential(exponential);
        let custom = match Retry::new(options) {
            Ok(retry) => retry,
            Err(e) => {
                self.say(format!("❌ {}", e));
                return;
            }
        };

        let attempts = AtomicU32::new(0);
        let result = custom
            .execute_sync(|| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                self.say(format!("🔄 Custom retry attempt {}", attempt));
                if attempt < 2 {
                    Err(format!("Custom retry failure on attempt {}", attempt))
                } else {
                    Ok(format!("Custom retry success after {} attempts!", attempt))
                }
            })
            .await;

        match result {
            Ok(message) => self.say(format!("✅ {}", message)),
            Err(e) => self.say(format!("❌ Custom retry failed: {}", e.message())),
        }
    }

    fn color_test(&self) {
        self.say("🎨 Color test - ConsoleLogger vs direct terminal colours\n");
        let test_error = std::io::Error::new(std::io::ErrorKind::Other, "I'm a TestError");

        self.say("📝 Test 1: ConsoleLogger output");
        self.say("=".repeat(50));
        let results = [
            self.console.log(["This is a LOG message"]),
            self.console.warn(["This is a WARN message"]),
            self.console.log_message(
                LogType::Error,
                &["This is an ERROR message".into(), LogItem::error(&test_error)],
            ),
            self.console.log_message(
                LogType::Trace,
                &["This is a TRACE message".into(), LogItem::error(&test_error)],
            ),
        ];

        println!("\n🌈 Test 2: Terminal ANSI verification");
        println!("{}", "=".repeat(50));
        println!("Red (31): {}", "This should be red".red());
        println!("Yellow (33): {}", "This should be yellow".yellow());
        println!("Green (32): {}", "This should be green".green());
        println!("Bright Red (91): {}", "This should be bright red".bright_red());
        println!("Bright Yellow (93): {}", "This should be bright yellow".bright_yellow());
        println!("Purple (35): {}", "This should be purple".purple());

        match results.into_iter().find_map(Result::err) {
            None => self.say("\n✅ Color test completed"),
            Some(e) => self.say(format!("❌ Color test failed: {}", e)),
        }
    }

    /// Prompts through the guided menus and returns the command to run
    fn interactive(&self) -> Option<Command> {
        self.say("🎮 Interactive mode - guided testing\n");

        let features = [
            "📝 Console logging",
            "📄 File logging",
            "🔄 Retry mechanism",
            "⚙️ Custom retry configuration",
            "🎨 Color testing",
            "🔙 Back to command mode",
        ];
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Which feature would you like to test?")
            .items(&features)
            .default(0)
            .interact();

        let outcome = match selection {
            Ok(0) => self.interactive_console(),
            Ok(1) => self.prompt("Enter message to log to file").map(Command::FileLog),
            Ok(2) => self
                .prompt_with_default("How many failures before success?", "2")
                .map(|n| Command::RetryTest(Some(n))),
            Ok(3) => self.interactive_custom_retry(),
            Ok(4) => Ok(Command::ColorTest),
            Ok(_) => {
                self.say("Returning to command mode...");
                return None;
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(command) => Some(command),
            Err(_) => {
                self.say("Interactive mode cancelled");
                None
            }
        }
    }

    fn interactive_console(&self) -> std::io::Result<Command> {
        let levels: Vec<&str> = LogType::ALL.iter().map(LogType::name).collect();
        let level = Select::with_theme(&self.theme)
            .with_prompt("Select log level")
            .items(&levels)
            .default(0)
            .interact()?;
        let message = self.prompt("Enter your message")?;
        Ok(Command::Emit(LogType::ALL[level], message))
    }

    fn interactive_custom_retry(&self) -> std::io::Result<Command> {
        let attempts = self.prompt_with_default("Maximum attempts", "3")?;
        let delay = self.prompt_with_default("Base delay in ms", "500")?;
        let exponential = self.prompt_with_default("Exponential backoff (true/false)", "true")?;
        Ok(Command::RetryConfig(vec![attempts, delay, exponential]))
    }

    fn prompt(&self, prompt: &str) -> std::io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| -> Result<(), &'static str> {
                if input.trim().is_empty() {
                    Err("Please enter a message")
                } else {
                    Ok(())
                }
            })
            .interact_text()
    }

    fn prompt_with_default(&self, prompt: &str, default: &str) -> std::io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
    }
}

/// Parses an optional non-negative count, using `default` when absent
fn parse_count(arg: Option<&str>, default: u32) -> Option<u32> {
    match arg {
        None => Some(default),
        Some(value) => value.trim().parse::<u32>().ok(),
    }
}

fn print_help() {
    println!("\n{}", "Commands:".bright_yellow());
    println!("  {:<38} - {}", "log|warn|error|trace <message>".bright_green(), "Write a message with the console logger");
    println!("  {:<38} - {}", "file-log <message>".bright_green(), "Append a message with the file logger");
    println!("  {:<38} - {}", "retry-test [failures]".bright_green(), "Fail N times (default 2) before succeeding");
    println!("  {:<38} - {}", "retry-config [attempts] [delay] [exp]".bright_green(), "Run with a custom retry policy");
    println!("  {:<38} - {}", "color-test".bright_green(), "Compare logger colours with raw ANSI colours");
    println!("  {:<38} - {}", "interactive".bright_green(), "Guided testing with menus");
    println!("  {:<38} - {}", "help".bright_green(), "Show this help");
    println!("  {:<38} - {}", "exit".bright_green(), "Quit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    if let Some(path) = cli.log_file {
        config.file.log_file_path = Some(path);
    }
    if cli.time {
        config.console.time_enabled = true;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("[WARNING] {}", e);
    }

    let app = ManualTestCli::new(&config)?;
    app.run().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("help"), Some(Command::Help));
        assert_eq!(
            Command::parse("warn disk  almost full"),
            Some(Command::Emit(LogType::Warn, "disk almost full".to_string()))
        );
        assert_eq!(
            Command::parse("file-log hello"),
            Some(Command::FileLog("hello".to_string()))
        );
        assert_eq!(
            Command::parse("retry-test 3"),
            Some(Command::RetryTest(Some("3".to_string())))
        );
        assert_eq!(
            Command::parse("retry-config 2 10 false"),
            Some(Command::RetryConfig(vec!["2".into(), "10".into(), "false".into()]))
        );
        assert_eq!(Command::parse("QUIT"), Some(Command::Exit));
        assert_eq!(
            Command::parse("frobnicate"),
            Some(Command::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(None, 2), Some(2));
        assert_eq!(parse_count(Some("5"), 2), Some(5));
        assert_eq!(parse_count(Some("-1"), 2), None);
        assert_eq!(parse_count(Some("abc"), 2), None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["utilkit", "--time", "--log-file", "out.log", "-l", "debug"]);
        assert!(cli.time);
        assert_eq!(cli.log_file, Some(PathBuf::from("out.log")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.config.is_none());
    }
}
