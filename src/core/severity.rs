//! Severity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log message.
///
/// `None` marks an empty record and is never produced by the logging methods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    None = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// One-letter tag used in broadcast lines, e.g. `[I]`.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::None => "N",
            Severity::Debug => "D",
            Severity::Info => "I",
            Severity::Warn => "W",
            Severity::Error => "E",
            Severity::Fatal => "F",
        }
    }

    /// Level the message is written at on the sink side.
    ///
    /// Debug goes out at warn level while its broadcast line keeps the `D` tag.
    pub fn sink_level(&self) -> Severity {
        match self {
            Severity::Debug => Severity::Warn,
            other => *other,
        }
    }

    /// Whether messages of this severity carry a call site.
    #[inline]
    pub fn carries_call_site(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::None => BrightBlack,
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warn => Yellow,
            Severity::Error => Red,
            Severity::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NONE" | "N" => Ok(Severity::None),
            "DEBUG" | "D" => Ok(Severity::Debug),
            "INFO" | "I" => Ok(Severity::Info),
            "WARN" | "WARNING" | "W" => Ok(Severity::Warn),
            "ERROR" | "E" => Ok(Severity::Error),
            "FATAL" | "F" => Ok(Severity::Fatal),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}
