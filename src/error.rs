//! Configuration error types

use thiserror::Error;

/// Errors raised at the fallible edges of the crate.
///
/// Resolution itself absorbs `Io` and `Parse` into its defaults-fallback
/// policy; they surface to callers only through [`Properties::parse`] and
/// the validating conversions on [`Environment`].
///
/// [`Properties::parse`]: crate::properties::Properties::parse
/// [`Environment`]: crate::environment::Environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Property resource could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed property text
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based logical line the error was detected on
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// Rejected environment name
    #[error("invalid environment name: {0}")]
    InvalidEnvironment(String),
}

impl ConfigError {
    /// Create a new parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a new invalid-environment error
    pub fn invalid_environment(message: impl Into<String>) -> Self {
        ConfigError::InvalidEnvironment(message.into())
    }
}
