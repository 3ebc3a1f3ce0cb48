//! In-app console example
//!
//! Demonstrates named loggers writing to the console appender while an
//! in-app console receives every formatted line through the broadcaster.
//!
//! Run with: cargo run --example console_broadcast

use relay_log::prelude::*;
use relay_log::{error, info};
use std::time::Duration;

struct GridBinding;

fn load_layout(logger: &AsyncLogger, path: &str) {
    error!(logger, "Layout file {} not found", path);
}

fn main() -> Result<()> {
    println!("=== relay_log - Console Broadcast Example ===\n");

    let registry = LogRegistry::builder()
        .gate(LevelGate::from_threshold(Severity::Info))
        .appenders(|_| vec![Box::new(ConsoleAppender::new()) as Box<dyn Appender>])
        .build()?;

    // The in-app console listens on a channel
    let (_console_id, console) = registry.broadcaster().subscribe_channel();

    println!("1. Named loggers:");
    let grid = registry.get_logger("Grid")?;
    let binding = registry.get_logger_for::<GridBinding>()?;

    grid.info("Grid created");
    info!(grid, "{} rows loaded", 250);
    grid.debug("Hidden: debug is gated off");
    binding.warn("Binding source is empty");

    println!("\n2. Errors carry their call site:");
    load_layout(&grid, "layout.xml");
    registry.error("Unhandled exception in dispatcher");

    println!("\n3. Lines received by the in-app console:");
    while let Ok(line) = console.recv_timeout(Duration::from_millis(200)) {
        println!("   console> {}", line);
    }

    println!("\n4. Disposing:");
    registry.dispose();
    println!(
        "   Grid logger processed {} messages, suppressed {}",
        grid.metrics().processed(),
        grid.metrics().suppressed()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
