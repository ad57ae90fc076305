//! Sources of override values.

use std::collections::{BTreeMap, HashMap};

use crate::properties::Properties;

/// Read-only source of named override values.
///
/// Override operations take their source explicitly; the process environment
/// is one implementation, not an ambient default.
pub trait VarSource {
    /// Value of `name`, if the source has one
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VarSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VarSource for Properties {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

impl<S: VarSource + ?Sized> VarSource for &S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}
