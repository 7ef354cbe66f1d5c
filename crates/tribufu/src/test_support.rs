//! Environment helpers shared by the wrapper unit tests

use std::sync::Mutex;

/// Serializes tests that mutate environment variables.
pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
pub(crate) unsafe fn set_env(key: &str, val: &str) {
    unsafe { std::env::set_var(key, val) };
}

/// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
pub(crate) unsafe fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) };
}
