//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// Severity-leveled sink a logger forwards processed messages to.
///
/// `entry.level` is already the sink level, so implementations route on it
/// directly.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
