//! Test helpers for code that reads process environment variables
//!
//! Environment variables are process-global, so tests that set `TZ` take
//! `ENV_MUTEX` and restore the previous value through `EnvVarGuard`.

use once_cell::sync::Lazy;
use std::env;

pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Restores every variable it touched when dropped, including on panic
pub struct EnvVarGuard {
    vars: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set `key`, remembering its previous value
    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.push((key.to_string(), env::var(key).ok()));
        // SAFETY: callers hold ENV_MUTEX while the guard is alive
        unsafe {
            env::set_var(key, value);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        while let Some((key, previous)) = self.vars.pop() {
            // SAFETY: callers hold ENV_MUTEX while the guard is alive
            unsafe {
                match previous {
                    Some(value) => env::set_var(&key, value),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

impl Default for EnvVarGuard {
    fn default() -> Self {
        Self::new()
    }
}
