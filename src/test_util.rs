//! Shared helpers for tests that touch process environment variables.

use std::sync::{Mutex, MutexGuard, PoisonError};

// Process environment is global; tests that read or write it run one at a
// time.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take the environment lock for the duration of a test.
pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets and removes environment variables, restoring the previous values on
/// drop.
pub(crate) struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub(crate) fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.remember(key);
        unsafe {
            std::env::remove_var(key);
        }
    }

    fn remember(&mut self, key: &str) {
        let original = std::env::var(key).ok();
        self.vars_to_restore.push((key.to_string(), original));
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, original_value) in self.vars_to_restore.drain(..).rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(&key, value),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}
