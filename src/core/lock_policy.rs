//! Bounded lock acquisition for the enqueue path
//!
//! A caller that only wants to log must never hang forever on a stuck queue
//! lock. The enqueue path takes the lock through a [`LockRetryPolicy`]: a fixed
//! number of timed attempts, then an escalation. Running out of attempts means
//! the logging pipeline is broken, so the default escalation panics instead of
//! dropping the message.

use super::error::LoggerError;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default number of lock attempts
pub const DEFAULT_LOCK_ATTEMPTS: u32 = 10;

/// Default wait per lock attempt
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Callback invoked when the retry budget is exhausted
pub type ExhaustionCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// What happens when the queue lock cannot be acquired.
#[derive(Clone, Default)]
pub enum Escalation {
    /// Panic with the [`LoggerError::QueueLockExhausted`] message (default)
    #[default]
    Panic,

    /// Hand the error to a callback; the message is lost if it returns
    Callback(ExhaustionCallback),
}

impl fmt::Debug for Escalation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Escalation::Panic => write!(f, "Panic"),
            Escalation::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

/// Retry policy for the queue lock
///
/// # Example
///
/// ```
/// use relay_log::LockRetryPolicy;
/// use std::time::Duration;
///
/// let policy = LockRetryPolicy::default();
/// assert_eq!(policy.max_attempts, 10);
/// assert_eq!(policy.attempt_timeout, Duration::from_secs(5));
///
/// let fast = LockRetryPolicy::new(3, Duration::from_millis(20));
/// assert_eq!(fast.total_budget(), Duration::from_millis(60));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    #[serde(skip)]
    pub escalation: Escalation,
}

impl LockRetryPolicy {
    pub fn new(max_attempts: u32, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts,
            attempt_timeout,
            escalation: Escalation::Panic,
        }
    }

    #[must_use]
    pub fn with_escalation(mut self, escalation: Escalation) -> Self {
        self.escalation = escalation;
        self
    }

    /// Longest time a caller can spend waiting for the lock
    pub fn total_budget(&self) -> Duration {
        self.attempt_timeout * self.max_attempts
    }

    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.max_attempts == 0 {
            return Err(LoggerError::config(
                "LockRetryPolicy",
                "max_attempts must be at least 1",
            ));
        }
        Ok(())
    }

    /// Try to lock `mutex` within the retry budget
    pub fn acquire<'a, T>(&self, mutex: &'a Mutex<T>) -> Option<MutexGuard<'a, T>> {
        (0..self.max_attempts).find_map(|_| mutex.try_lock_for(self.attempt_timeout))
    }

    /// Run the escalation for an exhausted budget
    pub fn escalate(&self, error: &LoggerError) {
        match &self.escalation {
            Escalation::Panic => panic!("{}", error),
            Escalation::Callback(callback) => callback(error),
        }
    }
}

impl Default for LockRetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_ATTEMPTS, DEFAULT_LOCK_TIMEOUT)
    }
}
