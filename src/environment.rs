//! Environment names for configuration resolution

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named configuration profile selecting which property resource to load.
///
/// Environment names are free-form (`development`, `production`, `qa-eu`,
/// ...) rather than a closed set. A name becomes the stem of the
/// `<environment>.properties` resource file, so it must be non-empty,
/// must not contain path separators, and must not start with a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    /// Environment variable naming the active environment
    pub const ENV_VAR: &'static str = "GARAGE_ENVIRONMENT";

    /// Environment selected when nothing else names one
    pub const DEFAULT: &'static str = "development";

    /// Read the active environment from the `GARAGE_ENVIRONMENT` variable.
    ///
    /// Returns the default (`development`) when the variable is unset or its
    /// value is not a usable environment name. This is the single
    /// entry-boundary shim over ambient process state; resolution takes the
    /// environment as an explicit value.
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::debug!(value = %raw, "unusable {} value, using default", Self::ENV_VAR);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Convert the environment to a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the property resource this environment selects
    pub(crate) fn file_name(&self) -> String {
        format!("{}.properties", self.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment(Self::DEFAULT.to_string())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ConfigError::invalid_environment("name is empty"));
        }
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ConfigError::invalid_environment(format!(
                "'{name}' cannot be used as a resource file stem"
            )));
        }
        Ok(Environment(name.to_string()))
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
