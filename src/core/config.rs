//! Logger configuration

use super::error::Result;
use super::lock_policy::LockRetryPolicy;
use super::severity::Severity;
use serde::{Deserialize, Serialize};

/// Which gated severities are enabled.
///
/// Only Debug, Error and Fatal are gated. Info and Warn are always written,
/// whatever the gate says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGate {
    pub debug: bool,
    pub error: bool,
    pub fatal: bool,
}

impl LevelGate {
    /// Everything enabled
    pub const ALL: LevelGate = LevelGate {
        debug: true,
        error: true,
        fatal: true,
    };

    /// Enable the gated levels at or above `threshold`.
    ///
    /// ```
    /// use relay_log::{LevelGate, Severity};
    ///
    /// let gate = LevelGate::from_threshold(Severity::Info);
    /// assert!(!gate.is_enabled(Severity::Debug));
    /// assert!(gate.is_enabled(Severity::Error));
    /// ```
    pub fn from_threshold(threshold: Severity) -> Self {
        Self {
            debug: Severity::Debug >= threshold,
            error: Severity::Error >= threshold,
            fatal: Severity::Fatal >= threshold,
        }
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        match severity {
            Severity::Debug => self.debug,
            Severity::Error => self.error,
            Severity::Fatal => self.fatal,
            Severity::Info | Severity::Warn => true,
            Severity::None => false,
        }
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::ALL
    }
}

/// Settings shared by every logger a registry creates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub gate: LevelGate,
    #[serde(default)]
    pub lock_policy: LockRetryPolicy,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<()> {
        self.lock_policy.validate()
    }
}
