// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport implementations.
//!
//! This module provides the transports the client can talk through:
//! - `http`: reqwest-based client for the real API
//! - `mock`: in-memory canned responses for tests

pub mod http;
pub mod mock;

use async_trait::async_trait;

use crate::error::TransportError;

/// HTTP verb, as recorded by the mock transport and printed in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case verb name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Raw request/response channel to the API.
///
/// Paths are relative to the API base URL (e.g. `/services/<id>`). Bodies are
/// already-serialized JSON. Implementations must report a missing resource as
/// [`TransportError::NotFound`] so the client can tell it apart from other
/// failures.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path`, returning the response body.
    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    /// POST `body` to `path`, returning the response body.
    async fn post(&self, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>, TransportError>;

    /// PUT `body` to `path`, returning the response body.
    async fn put(&self, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>, TransportError>;

    /// PATCH `body` to `path`, returning the response body.
    async fn patch(&self, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>, TransportError>;

    /// DELETE `path`.
    async fn delete(&self, path: &str) -> Result<(), TransportError>;
}
