//! Appender implementations

#[cfg(feature = "console")]
pub mod console;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleAppender;
pub use memory::MemoryAppender;

// Re-export trait for convenience
pub use crate::core::Appender;
