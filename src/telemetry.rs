//! Telemetry utilities: subscriber setup and command timing.

use crate::command::CommandPath;
use crate::config::{ConfigError, LoggingConfig};
use std::time::Instant;
use tracing::trace;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured filter. Fails if a subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| ConfigError::Logging(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

/// Guard for timing command execution.
///
/// Records command latency when dropped.
pub struct CommandTimer<'a> {
    command: &'a CommandPath,
    start: Instant,
}

impl<'a> CommandTimer<'a> {
    /// Start timing a command.
    pub fn new(command: &'a CommandPath) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer<'_> {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        trace!(command = %self.command, duration, "Command finished");
    }
}
