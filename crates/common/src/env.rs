//! Prefixed environment variable lookup
//!
//! SDK bootstrap reads variables named `<PREFIX>_<KEY>` (for example
//! `TRIBUFU_CLIENT_ID`). Unset, empty and non-UTF-8 values are all treated as
//! absent so a half-configured environment produces `None` instead of an
//! error.

/// Prefix used when the caller does not supply one.
pub const DEFAULT_PREFIX: &str = "TRIBUFU";

/// Build the variable name for `key` under `prefix`.
///
/// An empty prefix yields the bare key; a prefix already ending in `_` is not
/// doubled.
pub fn var_name(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else if prefix.ends_with('_') {
        format!("{prefix}{key}")
    } else {
        format!("{prefix}_{key}")
    }
}

/// Read `<prefix>_<key>`, returning `None` for unset or blank values.
pub fn lookup(prefix: &str, key: &str) -> Option<String> {
    std::env::var(var_name(prefix, key))
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
