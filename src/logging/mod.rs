// Logging module for structured logging using the tracing crate

use std::error::Error;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the tracing subscriber for structured logging
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so rendered images can be piped through stdout.
///
/// Calling this more than once is harmless: once a global subscriber is
/// installed, later calls return `Ok(())` without touching it.
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive.
///
/// # Examples
///
/// ```
/// use photomark::config::LoggingConfig;
/// use photomark::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    // Losing a race against another initializer is not an error
    if let Err(e) = result {
        if !tracing::dispatcher::has_been_set() {
            let e: Box<dyn Error> = e;
            return Err(e);
        }
    }

    Ok(())
}
