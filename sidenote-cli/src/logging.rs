//! stderr logging for the CLI.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Start the logger. `RUST_LOG` wins over `level` when set. Keep the handle
/// alive for the life of the process.
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .with_context(|| format!("Invalid log level `{}`", level))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("Failed to start logger")
}
