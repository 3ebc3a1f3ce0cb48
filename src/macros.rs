//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!`. `error!` and `fatal!`
//! also record the enclosing function name and line, which the plain
//! `error`/`fatal` methods cannot know.
//!
//! # Examples
//!
//! ```
//! use relay_log::prelude::*;
//! use relay_log::{error, info};
//!
//! let registry = LogRegistry::new().unwrap();
//! let logger = registry.get_logger("Server").unwrap();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! fn bind(logger: &AsyncLogger) {
//!     error!(logger, "Address {} in use", "0.0.0.0:8080");
//! }
//! bind(&logger);
//! ```

/// Log a message at an explicit severity.
///
/// Error and Fatal record the call site of the macro invocation.
///
/// ```
/// # use relay_log::prelude::*;
/// # let logger = AsyncLogger::builder("doc").build().unwrap();
/// use relay_log::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        match $severity {
            $crate::Severity::Debug => $logger.debug(format!($($arg)+)),
            $crate::Severity::Info => $logger.info(format!($($arg)+)),
            $crate::Severity::Warn => $logger.warn(format!($($arg)+)),
            $crate::Severity::Error => $logger.error_at(format!($($arg)+), $crate::call_site!()),
            $crate::Severity::Fatal => $logger.fatal_at(format!($($arg)+), $crate::call_site!()),
            $crate::Severity::None => {}
        }
    };
}

/// Log a debug-level message.
///
/// ```
/// # use relay_log::prelude::*;
/// # let logger = AsyncLogger::builder("doc").build().unwrap();
/// use relay_log::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format!($($arg)+))
    };
}

/// Log an info-level message.
///
/// ```
/// # use relay_log::prelude::*;
/// # let logger = AsyncLogger::builder("doc").build().unwrap();
/// use relay_log::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// ```
/// # use relay_log::prelude::*;
/// # let logger = AsyncLogger::builder("doc").build().unwrap();
/// use relay_log::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format!($($arg)+))
    };
}

/// Log an error-level message with the enclosing function and line.
///
/// ```
/// # use relay_log::prelude::*;
/// # let logger = AsyncLogger::builder("doc").build().unwrap();
/// use relay_log::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_at(format!($($arg)+), $crate::call_site!())
    };
}

/// Log a fatal-level message with the enclosing function and line.
///
/// ```
/// # use relay_log::prelude::*;
/// # let logger = AsyncLogger::builder("doc").build().unwrap();
/// use relay_log::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_at(format!($($arg)+), $crate::call_site!())
    };
}
