//! Output format configuration for appenders
//!
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format, one object per line

use super::log_entry::LogEntry;

/// Timestamp layout used by text output
pub const TEXT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `2025-01-08 10:30:45.120 [INFO ] Grid (main) - Request processed`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.120Z","level":"INFO","logger":"Grid",...}`
    Json,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry) -> String {
        match self {
            OutputFormat::Text => self.format_text(entry),
            OutputFormat::Json => self.format_json(entry),
        }
    }

    fn format_text(&self, entry: &LogEntry) -> String {
        format!(
            "{} [{:5}] {} ({}) - {}",
            entry.timestamp.format(TEXT_TIMESTAMP_FORMAT),
            entry.level.to_str(),
            entry.logger,
            entry.thread,
            entry.message
        )
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            serde_json::Value::String(entry.timestamp.to_rfc3339()),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "logger".to_string(),
            serde_json::Value::String(entry.logger.clone()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        json_obj.insert(
            "thread".to_string(),
            serde_json::Value::String(entry.thread.clone()),
        );

        if let Some(ref method) = entry.method {
            json_obj.insert("method".to_string(), serde_json::Value::String(method.clone()));
        }
        if let Some(ref file) = entry.file {
            json_obj.insert("file".to_string(), serde_json::Value::String(file.clone()));
        }
        if let Some(line) = entry.line {
            json_obj.insert("line".to_string(), serde_json::Value::Number(line.into()));
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogMessage, Severity};

    fn entry(severity: Severity, text: &str, site: Option<CallSite>) -> LogEntry {
        LogEntry::from_message("Grid", &LogMessage::new(severity, text, site))
    }

    #[test]
    fn test_text_format() {
        let result = OutputFormat::Text.format(&entry(Severity::Info, "Test message", None));

        assert!(result.contains("[INFO ]"));
        assert!(result.contains("Grid"));
        assert!(result.contains("Test message"));
    }

    #[test]
    fn test_text_format_shows_debug_as_warn() {
        let result = OutputFormat::Text.format(&entry(Severity::Debug, "trace", None));
        assert!(result.contains("[WARN ]"));
    }

    #[test]
    fn test_json_format() {
        let site = CallSite::new("refresh", 31);
        let result = OutputFormat::Json.format(&entry(Severity::Error, "Error occurred", Some(site)));

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["logger"], "Grid");
        assert_eq!(parsed["message"], "Error occurred in : refresh(31)");
        assert_eq!(parsed["method"], "refresh");
        assert_eq!(parsed["line"], 31);
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn test_json_format_omits_missing_caller() {
        let result = OutputFormat::Json.format(&entry(Severity::Info, "ok", None));
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(parsed.get("method").is_none());
        assert!(parsed.get("line").is_none());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
