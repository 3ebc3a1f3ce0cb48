//! Record handed to appenders

use super::log_message::LogMessage;
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an [`Appender`](super::Appender) receives for one processed message.
///
/// `level` is the sink level (Debug messages arrive as Warn) while `severity`
/// keeps the level the message was logged at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub logger: String,
    pub level: Severity,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread: String,
    pub method: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn from_message(logger: &str, message: &LogMessage) -> Self {
        let call_site = message.call_site();
        Self {
            logger: logger.to_string(),
            level: message.severity().sink_level(),
            severity: message.severity(),
            message: Self::sanitize_message(&message.sink_text()),
            timestamp: message.timestamp(),
            thread: message.thread().to_string(),
            method: call_site.and_then(|site| site.method).map(String::from),
            file: call_site
                .map(|site| site.file)
                .filter(|file| !file.is_empty())
                .map(String::from),
            line: call_site.map(|site| site.line),
        }
    }
}
