// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock transport for testing.
//!
//! Returns canned results per verb without touching the network, and records
//! every call so tests can assert on paths and bodies.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Method, Transport};
use crate::error::TransportError;

/// Canned result for a body-returning verb.
pub type MockResult = Result<Vec<u8>, TransportError>;

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// HTTP verb.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl RecordedCall {
    /// Body parsed as JSON, if present and valid.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// Mock transport for testing.
pub struct MockTransport {
    /// GET results, consumed front to back. The last one repeats.
    get_results: Mutex<Vec<MockResult>>,
    post_result: MockResult,
    put_result: MockResult,
    patch_result: MockResult,
    delete_result: Result<(), TransportError>,
    /// Delay applied before every GET answers.
    pub get_delay: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a mock where every verb succeeds with an empty body.
    pub fn new() -> Self {
        Self {
            get_results: Mutex::new(vec![Ok(Vec::new())]),
            post_result: Ok(Vec::new()),
            put_result: Ok(Vec::new()),
            patch_result: Ok(Vec::new()),
            delete_result: Ok(()),
            get_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every GET with `result`.
    pub fn with_get(self, result: MockResult) -> Self {
        self.with_get_sequence(vec![result])
    }

    /// Answer GETs with `results` in order, then keep repeating the last one.
    /// An empty sequence is ignored.
    pub fn with_get_sequence(mut self, results: Vec<MockResult>) -> Self {
        if !results.is_empty() {
            self.get_results = Mutex::new(results);
        }
        self
    }

    /// Delay every GET by `delay`.
    pub fn with_get_delay(mut self, delay: Duration) -> Self {
        self.get_delay = delay;
        self
    }

    /// Answer every POST with `result`.
    pub fn with_post(mut self, result: MockResult) -> Self {
        self.post_result = result;
        self
    }

    /// Answer every PUT with `result`.
    pub fn with_put(mut self, result: MockResult) -> Self {
        self.put_result = result;
        self
    }

    /// Answer every PATCH with `result`.
    pub fn with_patch(mut self, result: MockResult) -> Self {
        self.patch_result = result;
        self
    }

    /// Answer every DELETE with `result`.
    pub fn with_delete(mut self, result: Result<(), TransportError>) -> Self {
        self.delete_result = result;
        self
    }

    /// All calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls made with `method`.
    pub async fn call_count(&self, method: Method) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    async fn record(&self, method: Method, path: &str, body: Option<Vec<u8>>) {
        self.calls.lock().await.push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> MockResult {
        self.record(Method::Get, path, None).await;

        if !self.get_delay.is_zero() {
            tokio::time::sleep(self.get_delay).await;
        }

        let mut results = self.get_results.lock().await;
        if results.len() > 1 {
            results.remove(0)
        } else {
            results.first().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    async fn post(&self, path: &str, body: Option<Vec<u8>>) -> MockResult {
        self.record(Method::Post, path, body).await;
        self.post_result.clone()
    }

    async fn put(&self, path: &str, body: Option<Vec<u8>>) -> MockResult {
        self.record(Method::Put, path, body).await;
        self.put_result.clone()
    }

    async fn patch(&self, path: &str, body: Option<Vec<u8>>) -> MockResult {
        self.record(Method::Patch, path, body).await;
        self.patch_result.clone()
    }

    async fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.record(Method::Delete, path, None).await;
        self.delete_result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_sequence_repeats_last() {
        let mock = MockTransport::new().with_get_sequence(vec![
            Ok(b"first".to_vec()),
            Ok(b"second".to_vec()),
        ]);

        assert_eq!(mock.get("/a").await.unwrap(), b"first");
        assert_eq!(mock.get("/a").await.unwrap(), b"second");
        assert_eq!(mock.get("/a").await.unwrap(), b"second");
        assert_eq!(mock.call_count(Method::Get).await, 3);
    }

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockTransport::new();
        mock.post("/apps", Some(b"{\"x\":1}".to_vec())).await.unwrap();
        mock.delete("/apps/1").await.unwrap();

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].json_body(), Some(serde_json::json!({"x": 1})));
        assert_eq!(calls[1].method, Method::Delete);
        assert_eq!(calls[1].path, "/apps/1");
        assert_eq!(calls[1].body, None);
    }
}
