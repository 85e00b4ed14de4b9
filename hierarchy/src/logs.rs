//! Run log for the hierarchy pipeline.
//!
//! Entries go to stderr so stdout stays free for the JSON document. The
//! format (prefixed text or JSON lines) and verbosity are process-wide and
//! set once by the CLI.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// How entries are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Global run logger
pub static LOGGER: Lazy<RunLogger> = Lazy::new(RunLogger::new);

/// Writes log entries to stderr.
pub struct RunLogger {
    quiet: AtomicBool,
    json: AtomicBool,
}

impl RunLogger {
    pub fn new() -> Self {
        Self {
            quiet: AtomicBool::new(false),
            json: AtomicBool::new(false),
        }
    }

    /// Suppress info and success entries. Warnings and errors still go out.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    pub fn set_format(&self, format: LogFormat) {
        self.json.store(format == LogFormat::Json, Ordering::Relaxed);
    }

    pub fn format(&self) -> LogFormat {
        if self.json.load(Ordering::Relaxed) {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    /// Line written for an entry, or `None` when it is filtered out.
    pub fn render(&self, entry: &LogEntry) -> Option<String> {
        let quiet = self.quiet.load(Ordering::Relaxed);
        if quiet && matches!(entry.level, LogLevel::Info | LogLevel::Success) {
            return None;
        }

        let line = match self.format() {
            LogFormat::Json => serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone()),
            LogFormat::Text => {
                let prefix = match entry.level {
                    LogLevel::Info => "   ",
                    LogLevel::Success => "   ✓",
                    LogLevel::Warning => "   ⚠️",
                    LogLevel::Error => "   ❌",
                };
                let indent = "   ".repeat(entry.indent as usize);
                format!("{}{} {}", indent, prefix, entry.message)
            }
        };
        Some(line)
    }

    pub fn log(&self, entry: LogEntry) {
        if let Some(line) = self.render(&entry) {
            eprintln!("{}", line);
        }
    }
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rendering() {
        let logger = RunLogger::new();

        assert_eq!(logger.render(&LogEntry::success("done")).unwrap(), "   ✓ done");
        assert_eq!(
            logger.render(&LogEntry::info("nested").with_indent(1)).unwrap(),
            "       nested"
        );
    }

    #[test]
    fn test_json_rendering() {
        let logger = RunLogger::new();
        logger.set_format(LogFormat::Json);

        let line = logger.render(&LogEntry::warning("careful")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "warning");
        assert_eq!(value["message"], "careful");
        assert_eq!(value["indent"], 0);
    }

    #[test]
    fn test_quiet_keeps_problems() {
        let logger = RunLogger::new();
        logger.set_quiet(true);

        assert!(logger.render(&LogEntry::info("hidden")).is_none());
        assert!(logger.render(&LogEntry::success("hidden")).is_none());
        assert!(logger.render(&LogEntry::warning("shown")).is_some());
        assert!(logger.render(&LogEntry::error("shown")).is_some());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(LogFormat::default().to_string(), "text");
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
