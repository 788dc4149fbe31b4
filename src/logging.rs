//! Logging setup for hosts embedding the engine.
//!
//! Installs a global tracing subscriber writing to stderr, filtered by the
//! directive from [`EngineSettings`]. `RUST_LOG` wins when set.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use crate::settings::EngineSettings;

/// Outcome of the one subscriber install, shared by every later call
static INSTALLED: OnceLock<Result<(), String>> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoggingError {
    /// The configured filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(String),
}

/// Initialize tracing for the engine.
///
/// Only the first call installs a subscriber; later calls return that first
/// outcome. Failures are returned so callers can keep running without logs.
pub fn init(settings: &EngineSettings) -> Result<(), LoggingError> {
    if let Some(outcome) = INSTALLED.get() {
        return outcome.clone().map_err(LoggingError::SetGlobal);
    }

    let env_filter = build_env_filter(&settings.log_filter)?;
    let mut installed_here = false;
    let outcome = INSTALLED.get_or_init(|| {
        installed_here = true;
        let subscriber = Registry::default()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr));
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    });

    if installed_here && outcome.is_ok() {
        tracing::info!("Logging initialized with filter '{}'", settings.log_filter);
    }
    outcome.clone().map_err(LoggingError::SetGlobal)
}

fn build_env_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        message: e.to_string(),
    })
}
