//! reqwest-backed transport
//!
//! Joins request paths onto a base URL, attaches the SDK identification
//! headers to every request, and returns the raw status with the body parsed
//! as JSON when possible.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

use crate::{Body, Error, Request, Response, Result, Transport};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tribufu.com";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LANGUAGE_HEADER: &str = "x-tribufu-language";
const VERSION_HEADER: &str = "x-tribufu-version";

/// HTTP transport over a shared `reqwest::Client`.
///
/// Cloning is cheap: the inner client is reference counted.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl HttpTransport {
    /// Build a transport with its own connection pool and request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Build(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing client (shares its pool and settings).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            default_headers: identification_headers(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: Request) -> Result<Response> {
        let url = self.url(&request.path);
        debug!(url = %url, "sending request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(self.default_headers.clone())
            .headers(request.headers);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(value) => builder.form(&value),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Request(format!("{url}: {e}")))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Decode(format!("reading body from {url}: {e}")))?;

        debug!(status, bytes = bytes.len(), "received response");

        Ok(Response::new(status, parse_body(&bytes)))
    }
}

impl Transport for HttpTransport {
    fn request(&self, request: Request) -> Pin<Box<dyn Future<Output = Result<Response>> + Send + '_>> {
        Box::pin(self.execute(request))
    }
}

/// Headers identifying the SDK on every request.
fn identification_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(LANGUAGE_HEADER),
        HeaderValue::from_static("rust"),
    );
    headers.insert(
        HeaderName::from_static(VERSION_HEADER),
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    headers
}

/// Empty → `Null`, JSON → parsed value, anything else → `Value::String`.
fn parse_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}
