//! Selective override operations.
//!
//! Each operation copies values from an external, higher-precedence channel
//! into a new map layered over a snapshot of the input; the input itself is
//! never mutated.

use std::collections::BTreeMap;

use crate::properties::Properties;
use crate::source::{ProcessEnv, VarSource};

impl Properties {
    /// For each of `names` present in `source`, copy its value into a new
    /// top layer under the same name. Names the source does not have leave
    /// the existing value visible.
    pub fn override_from<I, S>(&self, names: I, source: &S) -> Properties
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: VarSource + ?Sized,
    {
        let mut out = self.child();
        for name in names {
            let name = name.as_ref();
            if let Some(value) = source.var(name) {
                out.set(name, value);
            }
        }
        out
    }

    /// For each `external name -> target key` pair in `spec`, set the target
    /// key to the source's value for the external name, when the source has
    /// one.
    pub fn override_from_vars<S>(&self, spec: &BTreeMap<String, String>, source: &S) -> Properties
    where
        S: VarSource + ?Sized,
    {
        let mut out = self.child();
        for (external, target_key) in spec {
            if let Some(value) = source.var(external) {
                out.set(target_key.as_str(), value);
            }
        }
        out
    }

    /// [`override_from_vars`](Properties::override_from_vars) against the
    /// process environment.
    pub fn override_from_env(&self, spec: &BTreeMap<String, String>) -> Properties {
        self.override_from_vars(spec, &ProcessEnv)
    }

    /// Apply `props` by the spec's target-key names, then the process
    /// environment by the spec. The environment takes final precedence
    /// where both channels match.
    pub fn override_from_props_and_env<S>(
        &self,
        spec: &BTreeMap<String, String>,
        props: &S,
    ) -> Properties
    where
        S: VarSource + ?Sized,
    {
        self.override_from(spec.values(), props).override_from_env(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{EnvGuard, lock_env};

    fn target() -> Properties {
        [("com.acme.prop".to_string(), "value".to_string())]
            .into_iter()
            .collect()
    }

    fn spec(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_override_from_copies_matching_names() {
        let mut source = BTreeMap::new();
        source.insert("com.acme.prop".to_string(), "overridden".to_string());

        let actual = target().override_from(["com.acme.prop"], &source);
        assert_eq!(actual.get("com.acme.prop"), Some("overridden"));
    }

    #[test]
    fn test_override_from_skips_absent_names() {
        let source: BTreeMap<String, String> = BTreeMap::new();

        let actual = target().override_from(["com.acme.prop"], &source);
        assert_eq!(actual.get("com.acme.prop"), Some("value"));
    }

    #[test]
    fn test_override_from_does_not_mutate_input() {
        let mut source = BTreeMap::new();
        source.insert("com.acme.prop".to_string(), "overridden".to_string());

        let original = target();
        let layered = original.override_from(["com.acme.prop"], &source);

        assert_eq!(original.get("com.acme.prop"), Some("value"));
        assert_eq!(layered.parent().unwrap().get("com.acme.prop"), Some("value"));
    }

    #[test]
    fn test_override_from_properties_source() {
        let mut source = Properties::new();
        source.set("com.acme.prop", "overridden");

        let actual = target().override_from(["com.acme.prop"], &source);
        assert_eq!(actual.get("com.acme.prop"), Some("overridden"));
    }

    #[test]
    fn test_override_from_vars_sets_target_key() {
        let mut values = BTreeMap::new();
        values.insert("VAR_A".to_string(), "X".to_string());

        let actual = target().override_from_vars(&spec(&[("VAR_A", "com.acme.prop")]), &values);
        assert_eq!(actual.get("com.acme.prop"), Some("X"));
    }

    #[test]
    fn test_override_from_vars_absent_source_entry_leaves_target() {
        let values: BTreeMap<String, String> = BTreeMap::new();

        let actual = target().override_from_vars(&spec(&[("VAR_A", "com.acme.prop")]), &values);
        assert_eq!(actual.get("com.acme.prop"), Some("value"));
    }

    #[test]
    fn test_override_from_vars_empty_spec_is_identity() {
        let mut values = BTreeMap::new();
        values.insert("VAR_A".to_string(), "X".to_string());

        let actual = target().override_from_vars(&BTreeMap::new(), &values);
        assert_eq!(actual, target());
    }

    #[test]
    fn test_override_from_vars_does_not_mutate_input() {
        let mut values = BTreeMap::new();
        values.insert("VAR_A".to_string(), "X".to_string());

        let original = target();
        original.override_from_vars(&spec(&[("VAR_A", "com.acme.prop")]), &values);

        assert_eq!(original.get("com.acme.prop"), Some("value"));
    }

    #[test]
    fn test_override_from_env_set_variable_wins() {
        let _lock = lock_env();
        let mut env = EnvGuard::new();
        env.set("GARAGE_OVERRIDE_TEST_VAR", "from-env");

        let actual =
            target().override_from_env(&spec(&[("GARAGE_OVERRIDE_TEST_VAR", "com.acme.prop")]));
        assert_eq!(actual.get("com.acme.prop"), Some("from-env"));
    }

    #[test]
    fn test_override_from_env_unset_variable_leaves_target() {
        let _lock = lock_env();
        let mut env = EnvGuard::new();
        env.remove("GARAGE_OVERRIDE_TEST_MISSING");

        let actual =
            target().override_from_env(&spec(&[("GARAGE_OVERRIDE_TEST_MISSING", "com.acme.prop")]));
        assert_eq!(actual.get("com.acme.prop"), Some("value"));
    }

    #[test]
    fn test_override_from_props_and_env_env_wins() {
        let _lock = lock_env();
        let mut env = EnvGuard::new();
        env.set("GARAGE_CASCADE_VAR_1", "env-value-1");
        env.remove("GARAGE_CASCADE_VAR_2");

        let mut target = Properties::new();
        target.set("com.acme.prop1", "original-1");
        target.set("com.acme.prop2", "original-2");

        // props channel matches both target keys, env only the first
        let mut props = Properties::new();
        props.set("com.acme.prop1", "never seen, env wins");
        props.set("com.acme.prop2", "props-value-2");

        let overriding = spec(&[
            ("GARAGE_CASCADE_VAR_1", "com.acme.prop1"),
            ("GARAGE_CASCADE_VAR_2", "com.acme.prop2"),
        ]);

        let actual = target.override_from_props_and_env(&overriding, &props);

        assert_eq!(actual.get("com.acme.prop1"), Some("env-value-1"));
        assert_eq!(actual.get("com.acme.prop2"), Some("props-value-2"));

        // input untouched
        assert_eq!(target.get("com.acme.prop1"), Some("original-1"));
        assert_eq!(target.get("com.acme.prop2"), Some("original-2"));
    }

    #[test]
    fn test_override_from_props_and_env_unmatched_keys_keep_values() {
        let _lock = lock_env();
        let mut env = EnvGuard::new();
        env.remove("GARAGE_CASCADE_UNMATCHED");

        let props = Properties::new();
        let overriding = spec(&[("GARAGE_CASCADE_UNMATCHED", "com.acme.prop")]);

        let actual = target().override_from_props_and_env(&overriding, &props);
        assert_eq!(actual.get("com.acme.prop"), Some("value"));
    }
}
