//! Shared types for the Tribufu SDK workspace
//!
//! Holds the pieces every crate needs but none owns: the `Secret` wrapper
//! used for tokens, API keys and client secrets, prefixed environment
//! variable lookup, and the configuration error type.

pub mod env;
mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
