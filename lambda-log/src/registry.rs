//! The process-wide default logger
//!
//! The first logger built through [`create_logger`] becomes the default. Code without a
//! direct reference picks it up with [`get_logger`] or [`get_child_logger`].

use std::sync::OnceLock;

use serde_json::Value;

use crate::{Fields, LogError, LogResult, Logger, LoggerOptions};

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Builds a logger, registering it as the default if none is registered yet.
///
/// Later calls still return a fully usable logger; they just don't replace the default.
pub fn create_logger(options: LoggerOptions) -> LogResult<Logger> {
    let logger = Logger::new(options)?;
    // First writer wins; losing the race is not an error.
    let _ = DEFAULT.set(logger.clone());
    Ok(logger)
}

/// The default logger.
pub fn get_logger() -> LogResult<Logger> {
    DEFAULT.get().cloned().ok_or(LogError::NoDefaultLogger)
}

/// A child of the default logger tagged with `loggerName`.
pub fn get_child_logger(child_name: impl Into<String>) -> LogResult<Logger> {
    let mut fields = Fields::new();
    fields.insert("loggerName".to_string(), Value::String(child_name.into()));
    get_logger()?.child(fields)
}
