//! Console appender implementation

use crate::core::{Appender, LogEntry, OutputFormat, Result, Severity};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use relay_log::appenders::ConsoleAppender;
    /// use relay_log::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Render an entry the way [`append`](Appender::append) prints it
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => self.format_colored(entry),
            format => format.format(entry),
        }
    }

    fn format_colored(&self, entry: &LogEntry) -> String {
        let level_str = format!("{:5}", entry.level.to_str())
            .color(entry.level.color_code())
            .to_string();

        format!(
            "{} [{}] {} ({}) - {}",
            entry
                .timestamp
                .format(crate::core::output_format::TEXT_TIMESTAMP_FORMAT),
            level_str,
            entry.logger,
            entry.thread,
            entry.message
        )
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.render(entry);

        // Route Error and Fatal levels to stderr, others to stdout
        match entry.level {
            Severity::Error | Severity::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
