//! Process-wide environment access.
//!
//! Reads and writes go through one mutex so settings resolution and tests
//! that adjust `GITHUB_TOKEN` or `PRSNAP_*` never race.

use std::env;
use std::ffi::OsStr;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn lock() -> MutexGuard<'static, ()> {
    // A poisoned lock still guards nothing but `()`.
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Set an environment variable while holding the global lock.
pub fn set_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::set_var(key, value) };
}

/// Remove an environment variable while holding the global lock.
pub fn remove_var<K: AsRef<OsStr>>(key: K) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::remove_var(key) };
}

/// Read an environment variable while holding the global lock.
///
/// # Errors
///
/// Returns [`env::VarError`] when the variable is unset or not Unicode.
pub fn var<K: AsRef<OsStr>>(key: K) -> Result<String, env::VarError> {
    let _guard = lock();
    env::var(key)
}

/// Read a variable, treating unset, non-Unicode and empty values alike.
#[must_use]
pub fn non_empty_var<K: AsRef<OsStr>>(key: K) -> Option<String> {
    var(key).ok().filter(|value| !value.is_empty())
}

/// Set or clear `key`, returning its previous value for later restoration.
pub fn replace_var(key: &str, value: Option<&str>) -> Option<String> {
    let old = var(key).ok();
    value.map_or_else(|| remove_var(key), |v| set_var(key, v));
    old
}
