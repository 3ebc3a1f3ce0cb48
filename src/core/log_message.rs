//! Queued log record

use super::call_site::CallSite;
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;

// Thread-local cache for the thread label to avoid repeated allocations
thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the current thread, or its id when unnamed
fn current_thread_label() -> String {
    THREAD_LABEL_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let current = std::thread::current();
                current
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("{:?}", current.id()))
            })
            .clone()
    })
}

/// A message waiting in a logger's queue.
///
/// Built on the calling thread and moved into exactly one queue. Only Error
/// and Fatal messages carry a [`CallSite`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMessage {
    severity: Severity,
    text: String,
    call_site: Option<CallSite>,
    timestamp: DateTime<Utc>,
    thread: String,
}

impl LogMessage {
    /// Create a message; a call site is kept only for Error and Fatal.
    pub fn new(severity: Severity, text: impl Into<String>, call_site: Option<CallSite>) -> Self {
        Self {
            severity,
            text: text.into(),
            call_site: call_site.filter(|_| severity.carries_call_site()),
            timestamp: Utc::now(),
            thread: current_thread_label(),
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn call_site(&self) -> Option<CallSite> {
        self.call_site
    }

    /// Caller method, empty when no call site was captured
    pub fn caller_method(&self) -> &str {
        self.call_site.and_then(|site| site.method).unwrap_or("")
    }

    /// Caller line, zero when no call site was captured
    pub fn caller_line(&self) -> u32 {
        self.call_site.map(|site| site.line).unwrap_or(0)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Thread that created the message
    pub fn thread(&self) -> &str {
        &self.thread
    }

    /// Line published to broadcast subscribers.
    ///
    /// `[I]Name - text` for Debug/Info/Warn and
    /// `[E]Name - text - method(line)` for Error/Fatal (`file:line` when the
    /// function name was not captured).
    pub fn broadcast_line(&self, logger_name: &str) -> String {
        match self.call_site {
            Some(site) => format!(
                "[{}]{} - {} - {}",
                self.severity.tag(),
                logger_name,
                self.text,
                site
            ),
            None => format!("[{}]{} - {}", self.severity.tag(), logger_name, self.text),
        }
    }

    /// Text handed to the sink: `text in : method(line)` when a call site
    /// exists, the bare text otherwise.
    pub fn sink_text(&self) -> String {
        match self.call_site {
            Some(site) => format!("{} in : {}", self.text, site),
            None => self.text.clone(),
        }
    }
}
