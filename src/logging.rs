use crate::config::LoggingConfig;
use crate::constants;
use crate::error::{EtlError, Result};
use std::fs;
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

/// Initializes console logging, plus a JSON file log when `log_dir` is set.
///
/// Console output goes to stderr so stdout carries only the stage messages.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let directive: Directive = config
        .directive
        .parse()
        .map_err(|e| EtlError::Config(format!("invalid log directive '{}': {}", config.directive, e)))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let file_layer = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| EtlError::io(dir, e))?;
            let file_appender = tracing_appender::rolling::daily(dir, constants::LOG_FILE_NAME);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            // Keep the writer alive for the rest of the process so logs flush on exit
            std::mem::forget(guard);
            Some(fmt::layer().json().with_writer(non_blocking_writer))
        }
        None => None,
    };

    // A second init in the same process (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();
    Ok(())
}
