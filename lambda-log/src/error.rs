//! Errors surfaced while configuring loggers

use thiserror::Error;

/// An alias for Result<T, LogError> for convenience.
pub type LogResult<T> = std::result::Result<T, LogError>;

/// Captures configuration mistakes detected while building or looking up a [`crate::Logger`].
///
/// Log calls themselves never fail; these errors only come out of construction,
/// child derivation and the default-logger registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("Invalid log level '{name}'")]
    /// The name is not one of trace, debug, info, warn, error or fatal
    InvalidLevel {
        /// The rejected level name
        name: String,
    },
    #[error("Invalid argument! {message}")]
    /// Bad logger options
    InvalidArgument {
        /// What was wrong with the options
        message: String,
    },
    #[error("No logger has been created. Call `create_logger` to apply a default logger")]
    /// The registry was asked for a logger before one was created
    NoDefaultLogger,
}

impl LogError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
