// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for arukas-sdk.

use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when using the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (unparsable environment values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A parameter failed local validation. Nothing was sent.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the first offending field.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The remote resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected envelope or port format.
    #[error("decode error: {0}")]
    Decode(String),

    /// Request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Opaque failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(TransportError),

    /// The caller's cancellation token fired while waiting.
    #[error("wait cancelled")]
    Cancelled,

    /// The wait deadline elapsed before the target status was observed.
    #[error("wait deadline exceeded after {0}ms")]
    DeadlineExceeded(u64),
}

impl SdkError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SdkError::Validation {
            field,
            message: message.into(),
        }
    }

    /// True if this error reports a missing remote resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SdkError::NotFound(_))
    }
}

/// Errors reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The API answered 404 for this path.
    #[error("not found: {path}")]
    NotFound {
        /// Request path.
        path: String,
    },

    /// The API answered with a non-success status.
    #[error("unexpected status {status} from {path}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
        /// Response body, as text.
        body: String,
    },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for SdkError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound { path } => SdkError::NotFound(path),
            other => SdkError::Transport(other),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Decode(err.to_string())
    }
}
