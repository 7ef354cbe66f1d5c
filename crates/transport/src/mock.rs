//! Recording transport for tests
//!
//! Compiled for this crate's own tests and, behind the `test-utils` feature,
//! for downstream crates' tests.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{Error, Request, Response, Result, Transport};

/// Replays queued responses in order and records every request it sees.
/// With nothing queued, requests fail as a transport error.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with `status` and a JSON `body`.
    pub fn respond(&self, status: u16, body: serde_json::Value) {
        lock(&self.responses).push_back(Ok(Response::new(status, body)));
    }

    /// Queue a transport-level failure.
    pub fn fail(&self, message: &str) {
        lock(&self.responses).push_back(Err(Error::Request(message.to_owned())));
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<Request> {
        lock(&self.requests).last().cloned()
    }

    pub fn requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }
}

impl Transport for MockTransport {
    fn request(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response>> + Send + '_>> {
        lock(&self.requests).push(request);
        let next = lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(Error::Request("no response queued".into())));
        Box::pin(async move { next })
    }
}

// A panicking test must not poison the mock for the assertions that follow.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_in_order_then_fails() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"n": 1}));
        mock.fail("connection refused");

        let first = mock.request(Request::get("/a")).await.unwrap();
        assert_eq!(first.body, json!({"n": 1}));
        assert!(matches!(
            mock.request(Request::get("/b")).await,
            Err(Error::Request(message)) if message == "connection refused"
        ));
        assert!(mock.request(Request::get("/c")).await.is_err());

        assert_eq!(mock.calls(), 3);
        let paths: Vec<_> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, ["/a", "/b", "/c"]);
    }
}
