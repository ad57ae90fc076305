//! Environment-aware layered configuration.
//!
//! Loads key/value configuration from environment-named `.properties`
//! resources and merges it with caller-supplied defaults and external
//! override channels. The whole crate is synchronous, in-memory map
//! plumbing around one scoped resource read per resolution.
//!
//! # Layering (lowest to highest)
//! 1. Caller-supplied default properties
//! 2. `default.properties` in the namespace directory
//! 3. `<environment>.properties` in the namespace directory
//! 4. Override operations ([`Properties::override_from`] and friends),
//!    applied explicitly by the caller
//!
//! # Example
//!
//! ```no_run
//! use garage_config::{Properties, Resolver};
//!
//! let resolver = Resolver::from_env();
//! let resolved = resolver.resolve_with(
//!     "com.acme.billing",
//!     Properties::from_iter([("retries".to_string(), "3".to_string())]),
//! );
//!
//! let spec = [("BILLING_RETRIES".to_string(), "retries".to_string())]
//!     .into_iter()
//!     .collect();
//! let settings = resolved.properties.override_from_env(&spec);
//! ```

pub mod environment;
pub mod error;
pub mod overrides;
pub mod properties;
pub mod resolver;
pub mod source;

pub use environment::Environment;
pub use error::ConfigError;
pub use properties::Properties;
pub use resolver::{Origin, Resolved, Resolver};
pub use source::{ProcessEnv, VarSource};

#[cfg(test)]
pub(crate) mod test_util;
