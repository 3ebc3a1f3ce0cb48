//! In-memory appender
//!
//! Keeps every entry it receives in a shared buffer. Clones share the buffer,
//! so one clone can be handed to a logger while another is read by an
//! in-app console or a test.

use crate::core::{Appender, LogEntry, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryAppender {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: Option<usize>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` entries, discarding the oldest
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: Some(capacity),
        }
    }

    /// Snapshot of the entries received so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.entries.lock();
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Ok(());
            }
            if entries.len() >= capacity {
                entries.pop_front();
            }
        }
        entries.push_back(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogMessage, Severity};

    fn entry(text: &str) -> LogEntry {
        LogEntry::from_message("Grid", &LogMessage::new(Severity::Info, text, None))
    }

    #[test]
    fn test_clones_share_entries() {
        let reader = MemoryAppender::new();
        let mut writer = reader.clone();

        writer.append(&entry("one")).unwrap();
        writer.append(&entry("two")).unwrap();

        let texts: Vec<String> = reader.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_capacity_discards_oldest() {
        let mut appender = MemoryAppender::with_capacity(2);
        for text in ["a", "b", "c"] {
            appender.append(&entry(text)).unwrap();
        }

        let texts: Vec<String> = appender.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_capacity_keeps_newest_under_churn() {
        let mut appender = MemoryAppender::with_capacity(3);
        for i in 0..1_000 {
            appender.append(&entry(&i.to_string())).unwrap();
        }

        let texts: Vec<String> = appender.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(texts, vec!["997", "998", "999"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut appender = MemoryAppender::with_capacity(0);
        appender.append(&entry("x")).unwrap();
        assert!(appender.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut appender = MemoryAppender::new();
        appender.append(&entry("x")).unwrap();
        appender.clear();
        assert!(appender.is_empty());
    }
}
