//! Redacting wrapper for credentials
//!
//! Access tokens, refresh tokens, API keys and client secrets all travel
//! through the SDK inside `Secret`. Formatting never reveals the value, so a
//! credential can sit in a struct that derives `Debug` or be attached to a
//! tracing event without leaking. The buffer is zeroized on drop.

use std::fmt;

use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// Sensitive value, printed as `[REDACTED]`.
pub struct Secret<T: Zeroize>(T);

impl<T: Zeroize> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the wrapped value. Call sites are where a credential leaves
    /// the SDK (header rendering, request bodies), so keep them few.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl Secret<String> {
    /// Borrow the wrapped string as `&str`.
    pub fn expose_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Zeroize + Eq> Eq for Secret<T> {}

impl<'de, T: Zeroize + Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let secret = Secret::from("rt_live_value");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.to_string(), "[REDACTED]");
    }

    #[test]
    fn redacted_inside_derived_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Holder {
            key: Secret<String>,
        }

        let holder = Holder {
            key: Secret::from("api-key-123"),
        };
        let debug = format!("{holder:?}");
        assert!(!debug.contains("api-key-123"), "leaked: {debug}");
    }

    #[test]
    fn expose_returns_inner_value() {
        let secret = Secret::new(String::from("client-secret"));
        assert_eq!(secret.expose(), "client-secret");
        assert_eq!(secret.expose_str(), "client-secret");
        assert!(!secret.is_empty());
    }

    #[test]
    fn equality_compares_inner_values() {
        assert_eq!(Secret::from("a"), Secret::from("a"));
        assert_ne!(Secret::from("a"), Secret::from("b"));
    }

    #[test]
    fn deserializes_transparently() {
        #[derive(Deserialize)]
        struct Section {
            api_key: Secret<String>,
        }

        let section: Section = toml::from_str(r#"api_key = "k-1""#).unwrap();
        assert_eq!(section.api_key.expose_str(), "k-1");
    }
}
