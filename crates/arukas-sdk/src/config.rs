// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Client configuration.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, SdkError};

/// Default API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://app.arukas.io/api/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between status polls in `wait_for_state`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default `User-Agent` header.
pub fn default_user_agent() -> String {
    format!("arukas-sdk/{}", env!("CARGO_PKG_VERSION"))
}

/// Destination for request/response traces.
///
/// Cloning shares the underlying writer.
#[derive(Clone)]
pub struct TraceOut(Arc<Mutex<Box<dyn Write + Send>>>);

impl TraceOut {
    /// Wrap a writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Box::new(writer))))
    }

    /// Trace to stderr.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// Write one trace line. Write failures are ignored.
    pub fn line(&self, line: &str) {
        if let Ok(mut out) = self.0.lock() {
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }
    }
}

impl fmt::Debug for TraceOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TraceOut(..)")
    }
}

/// Connection parameters for [`ArukasClient`](crate::ArukasClient).
#[derive(Debug, Clone)]
pub struct ClientParam {
    /// API base URL. `None` uses [`DEFAULT_API_BASE_URL`].
    pub api_base_url: Option<String>,
    /// API token (required).
    pub token: String,
    /// API secret (required).
    pub secret: String,
    /// `User-Agent` header. `None` uses [`default_user_agent`].
    pub user_agent: Option<String>,
    /// Dump requests and responses.
    pub trace: bool,
    /// Where traces go. `None` sends them to `tracing` at debug level.
    pub trace_out: Option<TraceOut>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between status polls.
    pub poll_interval: Duration,
}

impl Default for ClientParam {
    fn default() -> Self {
        Self {
            api_base_url: None,
            token: String::new(),
            secret: String::new(),
            user_agent: None,
            trace: false,
            trace_out: None,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientParam {
    /// Create parameters with the given credentials and defaults elsewhere.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
            ..Self::default()
        }
    }

    /// Load parameters from environment variables.
    ///
    /// Environment variables:
    /// - `ARUKAS_JSON_API_TOKEN`: API token
    /// - `ARUKAS_JSON_API_SECRET`: API secret
    /// - `ARUKAS_JSON_API_URL`: API base URL (default: "https://app.arukas.io/api/")
    /// - `ARUKAS_USER_AGENT`: User-Agent header
    /// - `ARUKAS_DEBUG`: any non-empty value traces requests to stderr
    /// - `ARUKAS_TIMEOUT_MS`: request timeout in milliseconds (default: 30000)
    /// - `ARUKAS_POLL_INTERVAL_MS`: status poll interval in milliseconds (default: 1000)
    ///
    /// Missing credentials are not an error here; [`ClientParam::validate`]
    /// reports them.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("ARUKAS_JSON_API_TOKEN").unwrap_or_default();
        let secret = std::env::var("ARUKAS_JSON_API_SECRET").unwrap_or_default();

        let api_base_url = std::env::var("ARUKAS_JSON_API_URL")
            .ok()
            .filter(|v| !v.is_empty());

        let user_agent = std::env::var("ARUKAS_USER_AGENT")
            .ok()
            .filter(|v| !v.is_empty());

        let trace = std::env::var("ARUKAS_DEBUG")
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        let timeout_ms = env_millis("ARUKAS_TIMEOUT_MS", DEFAULT_TIMEOUT)?;
        let poll_interval_ms = env_millis("ARUKAS_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL)?;

        Ok(Self {
            api_base_url,
            token,
            secret,
            user_agent,
            trace,
            trace_out: trace.then(TraceOut::stderr),
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }

    /// Check that both credentials are present. Token is checked first.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(SdkError::validation("token", "token is required"));
        }
        if self.secret.is_empty() {
            return Err(SdkError::validation("secret", "secret is required"));
        }
        Ok(())
    }

    /// Effective API base URL.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Effective `User-Agent`.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(default_user_agent)
    }

    /// Set the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Send traces to the given sink (also enables tracing).
    pub fn with_trace_out(mut self, out: TraceOut) -> Self {
        self.trace = true;
        self.trace_out = Some(out);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the status poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

fn env_millis(name: &str, default: Duration) -> Result<u64> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => v
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid {}: {}", name, e))),
        _ => Ok(u64::try_from(default.as_millis()).unwrap_or(u64::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_param() {
        let param = ClientParam::default();
        assert_eq!(param.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(param.timeout, DEFAULT_TIMEOUT);
        assert_eq!(param.poll_interval, DEFAULT_POLL_INTERVAL);
        assert!(!param.trace);
        assert!(param.effective_user_agent().starts_with("arukas-sdk/"));
    }

    #[test]
    fn test_empty_overrides_fall_back_to_defaults() {
        let param = ClientParam::new("t", "s")
            .with_api_base_url("")
            .with_user_agent("");
        assert_eq!(param.base_url(), DEFAULT_API_BASE_URL);
        assert!(param.effective_user_agent().starts_with("arukas-sdk/"));
    }

    #[test]
    fn test_trace_out_enables_trace() {
        let param = ClientParam::new("t", "s")
            .with_trace_out(TraceOut::new(std::io::sink()));
        assert!(param.trace);
        assert!(param.trace_out.is_some());
    }

    #[test]
    fn test_env_millis_default_saturates() {
        assert_eq!(
            env_millis("ARUKAS_TEST_UNSET_INTERVAL_MS", Duration::from_secs(2)).unwrap(),
            2000
        );
        assert_eq!(
            env_millis("ARUKAS_TEST_UNSET_INTERVAL_MS", Duration::MAX).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn test_validate_checks_token_first() {
        let err = ClientParam::default().validate().unwrap_err();
        assert!(matches!(err, SdkError::Validation { field: "token", .. }));

        let err = ClientParam::new("foo", "").validate().unwrap_err();
        assert!(matches!(err, SdkError::Validation { field: "secret", .. }));
    }
}
