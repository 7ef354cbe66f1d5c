//! Transport abstraction for the Tribufu REST API
//!
//! Defines the `Transport` trait that decouples the SDK's authentication and
//! resource logic from the HTTP stack. `HttpTransport` is the reqwest-backed
//! implementation used in production; tests substitute `mock::MockTransport`
//! (behind the `test-utils` feature), which implements the same trait.
//!
//! A transport only moves bytes: it does not interpret status codes. Callers
//! decide what counts as success (the SDK treats anything other than 200 as
//! failure).

pub mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpTransport};
pub use reqwest::Method;
pub use reqwest::header::{self, HeaderMap, HeaderValue};

use std::future::Future;
use std::pin::Pin;

/// Request body encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    /// Serialized as `application/json`.
    Json(serde_json::Value),
    /// Serialized as `application/x-www-form-urlencoded`. The value must be a
    /// flat JSON object; absent fields are omitted rather than sent as null.
    Form(serde_json::Value),
}

impl Body {
    /// The JSON value carried by the body, if any.
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Empty => None,
            Body::Json(value) | Body::Form(value) => Some(value),
        }
    }
}

/// An outgoing request relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path starting with `/`, e.g. `/v1/servers/42`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Replace the header map.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    pub fn form(mut self, value: serde_json::Value) -> Self {
        self.body = Body::Form(value);
        self
    }
}

/// Status and parsed body of a completed exchange.
///
/// Bodies that are not JSON are carried as `Value::String`; an empty body is
/// `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Response {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// The API signals success with exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Deserialize the body into `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| Error::Decode(format!("unexpected response body: {e}")))
    }
}

/// Errors raised before a status code is available.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Executes requests against the API.
///
/// Uses a `Pin<Box<dyn Future>>` return type so the SDK can hold an
/// `Arc<dyn Transport>` shared across wrappers.
pub trait Transport: Send + Sync {
    /// Perform one request/response exchange.
    fn request(&self, request: Request) -> Pin<Box<dyn Future<Output = Result<Response>> + Send + '_>>;
}
