// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! reqwest transport for the Arukas API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use super::{Method, Transport};
use crate::config::{ClientParam, TraceOut};
use crate::error::{Result, SdkError, TransportError};

/// JSON:API media type, sent as both `Accept` and `Content-Type`.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

enum TraceTarget {
    Off,
    Sink(TraceOut),
    Log,
}

/// Transport that talks to the API over HTTPS.
///
/// Authenticates every request with basic auth (token as user, secret as
/// password). A 404 becomes [`TransportError::NotFound`], any other non-2xx
/// status becomes [`TransportError::Status`].
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
    secret: String,
    trace: TraceTarget,
}

impl HttpTransport {
    /// Build a transport from validated client parameters.
    pub fn new(param: &ClientParam) -> Result<Self> {
        param.validate()?;

        let client = reqwest::Client::builder()
            .timeout(param.timeout)
            .user_agent(param.effective_user_agent())
            .build()
            .map_err(|e| SdkError::Config(format!("failed to build HTTP client: {}", e)))?;

        let trace = match (&param.trace, &param.trace_out) {
            (false, _) => TraceTarget::Off,
            (true, Some(out)) => TraceTarget::Sink(out.clone()),
            (true, None) => TraceTarget::Log,
        };

        Ok(Self {
            client,
            base_url: param.base_url().to_string(),
            token: param.token.clone(),
            secret: param.secret.clone(),
            trace,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn trace(&self, line: impl FnOnce() -> String) {
        match &self.trace {
            TraceTarget::Off => {}
            TraceTarget::Sink(out) => out.line(&line()),
            TraceTarget::Log => debug!(target: "arukas_sdk::trace", "{}", line()),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        let url = join_url(&self.base_url, path);

        let mut request = self
            .client
            .request(reqwest_method(method), &url)
            .basic_auth(&self.token, Some(&self.secret))
            .header(ACCEPT, MEDIA_TYPE);

        match body {
            Some(body) => {
                self.trace(|| {
                    format!(
                        "--> {} {} {}",
                        method.as_str(),
                        url,
                        String::from_utf8_lossy(&body)
                    )
                });
                request = request.header(CONTENT_TYPE, MEDIA_TYPE).body(body);
            }
            None => self.trace(|| format!("--> {} {}", method.as_str(), url)),
        }

        let response = request.send().await.map_err(|e| {
            TransportError::Request(format!("{} {} failed: {}", method.as_str(), url, e))
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read response body: {}", e)))?;

        self.trace(|| format!("<-- {} {} {}", status, url, String::from_utf8_lossy(&bytes)));

        classify_response(status, path, bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> std::result::Result<Vec<u8>, TransportError> {
        self.send(Method::Get, path, None).await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        self.send(Method::Post, path, body).await
    }

    async fn put(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        self.send(Method::Put, path, body).await
    }

    async fn patch(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        self.send(Method::Patch, path, body).await
    }

    async fn delete(&self, path: &str) -> std::result::Result<(), TransportError> {
        self.send(Method::Delete, path, None).await.map(|_| ())
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Join a base URL and an API path with exactly one `/` between them.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map an HTTP status to the transport result.
fn classify_response(
    status: u16,
    path: &str,
    body: Vec<u8>,
) -> std::result::Result<Vec<u8>, TransportError> {
    match status {
        200..=299 => Ok(body),
        404 => Err(TransportError::NotFound {
            path: path.to_string(),
        }),
        _ => Err(TransportError::Status {
            status,
            path: path.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        }),
    }
}
