//! SDK error types
//!
//! Returned by constructors and the `try_*` resource methods. The plain
//! resource accessors and the token lifecycle flows report failure as
//! `None`/`false`/empty instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("authentication error: {0}")]
    Auth(#[from] tribufu_auth::Error),

    #[error("transport error: {0}")]
    Transport(#[from] transport::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias using SDK Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_auth_errors() {
        let err: Error = tribufu_auth::Error::InvalidToken("not a bot token".into()).into();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("not a bot token"));
    }

    #[test]
    fn status_display() {
        let err = Error::Status {
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(err.to_string(), "API returned 404: not found");
    }
}
