use flexi_logger::{opt_format, FlexiLoggerError, Logger, LoggerHandle};

/// Start logging to stderr. `RUST_LOG` wins over the level picked here.
/// Keep the returned handle alive for as long as logging is needed.
pub fn setup_logging(verbose: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = if verbose { "debug" } else { "info" };
    Logger::try_with_env_or_str(level)?
        .format(opt_format)
        .start()
}
