//! Error types for the logger system

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The queue lock could not be taken within the retry budget
    #[error("Cannot lock queue of logger '{logger}' after {attempts} attempts of {timeout:?}")]
    QueueLockExhausted {
        logger: String,
        attempts: u32,
        timeout: Duration,
    },

    /// Logger has been disposed and accepts no more messages
    #[error("Logger '{logger}' disposed")]
    LoggerDisposed { logger: String },

    /// Registry has been disposed and creates no more loggers
    #[error("Logger registry disposed")]
    RegistryDisposed,

    /// Worker thread could not be started
    #[error("Failed to spawn worker thread for logger '{logger}': {source}")]
    SpawnFailed {
        logger: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create a lock exhaustion error
    pub fn lock_exhausted(logger: impl Into<String>, attempts: u32, timeout: Duration) -> Self {
        LoggerError::QueueLockExhausted {
            logger: logger.into(),
            attempts,
            timeout,
        }
    }

    /// Create a disposed logger error
    pub fn disposed(logger: impl Into<String>) -> Self {
        LoggerError::LoggerDisposed {
            logger: logger.into(),
        }
    }

    /// Create a spawn failure error
    pub fn spawn_failed(logger: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SpawnFailed {
            logger: logger.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether the error means the logging pipeline itself is broken
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoggerError::QueueLockExhausted { .. })
    }
}
