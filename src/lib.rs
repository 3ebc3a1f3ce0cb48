//! # relay_log
//!
//! Named asynchronous loggers for desktop applications.
//!
//! ## Features
//!
//! - **One worker per logger**: every named logger owns a FIFO queue and a
//!   background thread, so logging never waits on appenders
//! - **Broadcast**: every formatted line is republished to subscribers such as
//!   an in-app console
//! - **Call sites**: error and fatal messages record the calling function and
//!   line before leaving the caller's thread
//! - **Bounded locking**: the enqueue lock is taken under a retry policy that
//!   escalates instead of hanging the caller
//!
//! ## Example
//!
//! ```
//! use relay_log::prelude::*;
//!
//! let registry = LogRegistry::new().unwrap();
//! let (_id, console) = registry.broadcaster().subscribe_channel();
//!
//! let logger = registry.get_logger("A").unwrap();
//! logger.info("1");
//! logger.warn("2");
//!
//! registry.dispose();
//! assert_eq!(console.try_iter().collect::<Vec<_>>(), vec!["[I]A - 1", "[W]A - 2"]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::appenders::MemoryAppender;
    pub use crate::core::{
        Appender, AsyncLogger, Broadcaster, CallSite, Escalation, LevelGate, LockRetryPolicy, Log,
        LogEntry, LogMessage, LogRegistry, LoggerConfig, LoggerError, LoggerMetrics, LoggerState,
        OutputFormat, Result, Severity, SubscriptionId,
    };
}

#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
pub use appenders::MemoryAppender;
pub use core::{
    Appender, AppenderFactory, AsyncLogger, AsyncLoggerBuilder, Broadcaster, CallSite, Escalation,
    ExhaustionCallback, LevelGate, LockRetryPolicy, Log, LogEntry, LogMessage, LogRegistry,
    LogRegistryBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerState, OutputFormat,
    Result, Severity, Subscriber, SubscriptionId, DEFAULT_LOCK_ATTEMPTS, DEFAULT_LOCK_TIMEOUT,
    GLOBAL_LOGGER_NAME,
};
