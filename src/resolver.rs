//! Environment-aware property resolution.
//!
//! The [`Resolver`] is the explicit resolution context: where property
//! resources live and which environment is active. Nothing in here reads
//! process-global state; [`Resolver::from_env`] is the one entry-boundary
//! constructor that consults environment variables.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::environment::Environment;
use crate::error::ConfigError;
use crate::properties::Properties;

/// Default configuration root directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Base layer loaded beneath every environment resource when present
const DEFAULT_BASENAME: &str = "default.properties";

/// Resolution context for environment-named property resources.
///
/// A namespace (`"com.acme.billing"`) selects the resource directory
/// `<root>/com/acme/billing/`; inside it, `default.properties` (optional)
/// and `<environment>.properties` (optional) are layered over the caller's
/// defaults. Resolution never fails: an unreadable or malformed layer is
/// skipped and logged, and when nothing loads the defaults come back
/// unchanged.
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Root directory property resources are resolved under
    root: PathBuf,
    /// Environment used when a call does not name one
    environment: Environment,
}

impl Resolver {
    /// Environment variable naming the configuration root directory
    pub const CONFIG_DIR_ENV: &'static str = "GARAGE_CONFIG_DIR";

    /// Create a resolver with an explicit root and environment
    pub fn new(root: impl Into<PathBuf>, environment: Environment) -> Self {
        Self {
            root: root.into(),
            environment,
        }
    }

    /// Entry-boundary constructor reading process state once.
    ///
    /// The root comes from `GARAGE_CONFIG_DIR` (default `config`), the
    /// environment from `GARAGE_ENVIRONMENT` (default `development`).
    pub fn from_env() -> Self {
        let root = std::env::var(Self::CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
        Self::new(root, Environment::from_env())
    }

    /// The configuration root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The active environment
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Resolve `namespace` in the active environment with no defaults.
    pub fn resolve(&self, namespace: &str) -> Resolved {
        self.resolve_with(namespace, Properties::new())
    }

    /// Resolve `namespace` in the active environment, layering loaded
    /// resources over `defaults`.
    pub fn resolve_with(&self, namespace: &str, defaults: Properties) -> Resolved {
        self.resolve_in(namespace, &self.environment, defaults)
    }

    /// Resolve `namespace` in an explicitly named environment.
    ///
    /// Layering, lowest to highest: `defaults`, then `default.properties`,
    /// then `<environment>.properties`. A missing, unreadable, or malformed
    /// resource skips its layer; [`Resolved::origin`] records which files
    /// were actually applied.
    pub fn resolve_in(
        &self,
        namespace: &str,
        environment: &Environment,
        defaults: Properties,
    ) -> Resolved {
        let dir = self.namespace_dir(namespace);
        let mut properties = defaults;
        let mut loaded = Vec::new();

        for path in [dir.join(DEFAULT_BASENAME), dir.join(environment.file_name())] {
            if let Some(layer) = load_layer(&path) {
                properties = layer.layer_over(&properties);
                loaded.push(path);
            }
        }

        let origin = if loaded.is_empty() {
            tracing::debug!(
                namespace,
                environment = %environment,
                "no property resources found, using defaults"
            );
            Origin::Defaults
        } else {
            Origin::Loaded(loaded)
        };

        Resolved { properties, origin }
    }

    /// Directory a dotted namespace maps to. Dots become path segments;
    /// the empty namespace is the root itself.
    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in namespace.split('.').filter(|s| !s.is_empty()) {
            dir.push(segment);
        }
        dir
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Outcome of a resolution: the merged properties plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The merged property map
    pub properties: Properties,
    /// Which resources produced it
    pub origin: Origin,
}

impl Resolved {
    /// Whether no resource was found and the properties are exactly the
    /// supplied defaults
    pub fn from_defaults(&self) -> bool {
        matches!(self.origin, Origin::Defaults)
    }
}

/// Which resources produced a [`Resolved`].
///
/// Distinguishes a resource that was present but empty (`Loaded` with the
/// file listed) from one that was absent (`Defaults`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Origin {
    /// Resource files were layered, in application order
    Loaded(Vec<PathBuf>),
    /// No resource was found; the defaults came back unchanged
    Defaults,
}

/// Read and parse one resource layer. Missing files are skipped quietly;
/// unreadable or malformed files are skipped with a warning.
fn load_layer(path: &Path) -> Option<Properties> {
    match Properties::load(path) {
        Ok(layer) => {
            tracing::trace!(
                path = %path.display(),
                entries = layer.len(),
                "loaded property resource"
            );
            Some(layer)
        }
        Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no such property resource, skipping layer");
            None
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "unusable property resource, skipping layer"
            );
            None
        }
    }
}
