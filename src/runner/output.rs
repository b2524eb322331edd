//! Log lines produced while a script runs.

use std::fmt;
use std::sync::{Arc, Mutex};

use colored::{ColoredString, Colorize};
use serde::Serialize;

/// Severity tag attached to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Untagged output, including lifecycle progress.
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    /// All levels, in console method order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Log,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Console method name for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Log => "log",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Debug => "debug",
        }
    }

    /// Apply this level's terminal color to `text`.
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            LogLevel::Log => text.normal(),
            LogLevel::Info => text.cyan(),
            LogLevel::Warn => text.yellow(),
            LogLevel::Error => text.red(),
            LogLevel::Debug => text.dimmed(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of script output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Untagged line.
    pub fn plain(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Log, message)
    }

    /// The message colored for a terminal.
    pub fn render(&self) -> String {
        self.level.paint(&self.message).to_string()
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receiver for the log lines of one invocation.
pub type LogSink = Arc<dyn Fn(&LogLine) + Send + Sync>;

/// A sink that drops everything.
pub fn null_sink() -> LogSink {
    Arc::new(|_: &LogLine| {})
}

/// A sink that prints colored lines to stdout.
pub fn stdout_sink() -> LogSink {
    Arc::new(|line: &LogLine| println!("{}", line.render()))
}

/// A sink that records lines, plus the shared buffer it records into.
pub fn collecting_sink() -> (LogSink, Arc<Mutex<Vec<LogLine>>>) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let target = Arc::clone(&buffer);
    let sink: LogSink = Arc::new(move |line: &LogLine| {
        if let Ok(mut lines) = target.lock() {
            lines.push(line.clone());
        }
    });
    (sink, buffer)
}

/// Combine two sinks; `first` sees each line before `second`.
pub fn tee(first: LogSink, second: LogSink) -> LogSink {
    Arc::new(move |line: &LogLine| {
        first(line);
        second(line);
    })
}
