//! Error types for OAuth2 operations
//!
//! These carry the specific cause of a failed exchange for logging. The
//! public `TokenManager` surface collapses them into `false`/`None`.

/// Errors from OAuth2 token operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport failed: {0}")]
    Transport(#[from] transport::Error),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
