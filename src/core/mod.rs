//! Core logger types and traits

pub mod appender;
pub mod broadcaster;
pub mod call_site;
pub mod config;
pub mod error;
pub mod lock_policy;
pub mod log;
pub mod log_entry;
pub mod log_message;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod registry;
pub mod severity;

pub use appender::Appender;
pub use broadcaster::{Broadcaster, Subscriber, SubscriptionId};
pub use call_site::CallSite;
pub use config::{LevelGate, LoggerConfig};
pub use error::{LoggerError, Result};
pub use lock_policy::{
    Escalation, ExhaustionCallback, LockRetryPolicy, DEFAULT_LOCK_ATTEMPTS, DEFAULT_LOCK_TIMEOUT,
};
pub use log::Log;
pub use log_entry::LogEntry;
pub use log_message::LogMessage;
pub use logger::{AsyncLogger, AsyncLoggerBuilder, LoggerState};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use registry::{AppenderFactory, LogRegistry, LogRegistryBuilder, GLOBAL_LOGGER_NAME};
pub use severity::Severity;
