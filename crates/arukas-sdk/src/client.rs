// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ArukasClient for interacting with the Arukas API.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{ClientParam, DEFAULT_POLL_INTERVAL};
use crate::error::{Result, SdkError};
use crate::request::RequestParam;
use crate::transport::Transport;
use crate::transport::http::HttpTransport;
use crate::types::{AppData, AppListData, ServiceData, ServiceListData, ServiceStatus};

const APPS_PATH: &str = "/apps";
const SERVICES_PATH: &str = "/services";

/// High-level client for managing Arukas apps and services.
///
/// Every operation is one round trip through the [`Transport`]: validate the
/// input locally, send, decode. Nothing is retried. Errors are returned as-is,
/// except that a transport "not found" becomes [`SdkError::NotFound`].
pub struct ArukasClient {
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
}

impl ArukasClient {
    /// Create a client that talks to the real API.
    ///
    /// Fails if the token or secret is empty.
    pub fn new(param: ClientParam) -> Result<Self> {
        let transport = HttpTransport::new(&param)?;
        debug!(base_url = %transport.base_url(), "Created Arukas client");

        Ok(Self {
            transport: Arc::new(transport),
            poll_interval: param.poll_interval,
        })
    }

    /// Create a client from environment variables (see [`ClientParam::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientParam::from_env()?)
    }

    /// Create a client on top of any transport.
    pub fn with_transport<T: Transport + 'static>(transport: Arc<T>) -> Self {
        Self {
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the pause between status polls in `wait_for_state*`.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Pause between status polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    // =========================================================================
    // Apps
    // =========================================================================

    /// Create an app together with its service.
    #[instrument(skip(self, param), fields(name = %param.name, image = %param.image))]
    pub async fn create_app(&self, param: &RequestParam) -> Result<AppData> {
        param.validate_for_create()?;
        debug!("Creating app");

        let body = encode(&param.to_create_body())?;
        let bytes = self.transport.post(APPS_PATH, Some(body)).await?;
        let app: AppData = decode(&bytes)?;

        info!(
            app_id = app.app_id().unwrap_or_default(),
            service_id = app.service_id().unwrap_or_default(),
            "App created"
        );
        Ok(app)
    }

    /// Get an app by ID.
    #[instrument(skip(self), fields(app_id = %app_id))]
    pub async fn read_app(&self, app_id: &str) -> Result<AppData> {
        validate_id(app_id)?;
        debug!("Reading app");

        let bytes = self.transport.get(&app_path(app_id)).await?;
        decode(&bytes)
    }

    /// List all apps.
    #[instrument(skip(self))]
    pub async fn list_apps(&self) -> Result<AppListData> {
        debug!("Listing apps");

        let bytes = self.transport.get(APPS_PATH).await?;
        decode(&bytes)
    }

    /// Delete an app and its service.
    #[instrument(skip(self), fields(app_id = %app_id))]
    pub async fn delete_app(&self, app_id: &str) -> Result<()> {
        validate_id(app_id)?;
        debug!("Deleting app");

        self.transport.delete(&app_path(app_id)).await?;
        info!("App deleted");
        Ok(())
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Get a service by ID.
    #[instrument(skip(self), fields(service_id = %service_id))]
    pub async fn read_service(&self, service_id: &str) -> Result<ServiceData> {
        validate_id(service_id)?;
        debug!("Reading service");

        let bytes = self.transport.get(&service_path(service_id)).await?;
        decode(&bytes)
    }

    /// List all services.
    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<ServiceListData> {
        debug!("Listing services");

        let bytes = self.transport.get(SERVICES_PATH).await?;
        decode(&bytes)
    }

    /// Change a service's image, instance count, ports, environment or plan.
    #[instrument(skip(self, param), fields(service_id = %service_id))]
    pub async fn update_service(
        &self,
        service_id: &str,
        param: &RequestParam,
    ) -> Result<ServiceData> {
        validate_id(service_id)?;
        param.validate_for_update()?;
        debug!("Updating service");

        let body = encode(&param.to_update_body(service_id))?;
        let bytes = self
            .transport
            .patch(&service_path(service_id), Some(body))
            .await?;
        let service: ServiceData = decode(&bytes)?;

        info!("Service updated");
        Ok(service)
    }

    // =========================================================================
    // Power
    // =========================================================================

    /// Start a service. Use `wait_for_state*` to wait until it is running.
    #[instrument(skip(self), fields(service_id = %service_id))]
    pub async fn power_on(&self, service_id: &str) -> Result<()> {
        validate_id(service_id)?;
        debug!("Powering on service");

        self.transport.post(&power_path(service_id), None).await?;
        info!("Power on requested");
        Ok(())
    }

    /// Stop a service. Use `wait_for_state*` to wait until it is stopped.
    #[instrument(skip(self), fields(service_id = %service_id))]
    pub async fn power_off(&self, service_id: &str) -> Result<()> {
        validate_id(service_id)?;
        debug!("Powering off service");

        self.transport.delete(&power_path(service_id)).await?;
        info!("Power off requested");
        Ok(())
    }

    // =========================================================================
    // Waiting
    // =========================================================================

    /// Poll a service until it reports `target`.
    ///
    /// Returns `Ok(())` once the status matches, the first read error as-is,
    /// or [`SdkError::Cancelled`] as soon as `cancel` fires (including while
    /// a read is in flight or between polls).
    #[instrument(skip(self, cancel), fields(service_id = %service_id, target = %target))]
    pub async fn wait_for_state(
        &self,
        service_id: &str,
        target: ServiceStatus,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.poll_status(service_id, target, cancel, None).await
    }

    /// Like [`wait_for_state`](Self::wait_for_state), bounded by a timeout.
    ///
    /// Returns [`SdkError::DeadlineExceeded`] once `timeout` has elapsed.
    #[instrument(skip(self), fields(service_id = %service_id, target = %target))]
    pub async fn wait_for_state_timeout(
        &self,
        service_id: &str,
        target: ServiceStatus,
        timeout: Duration,
    ) -> Result<()> {
        self.poll_status(service_id, target, &CancellationToken::new(), Some(timeout))
            .await
    }

    /// Wait with both a cancellation token and a timeout.
    #[instrument(skip(self, cancel), fields(service_id = %service_id, target = %target))]
    pub async fn wait_for_state_until(
        &self,
        service_id: &str,
        target: ServiceStatus,
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Result<()> {
        self.poll_status(service_id, target, cancel, Some(timeout))
            .await
    }

    async fn poll_status(
        &self,
        service_id: &str,
        target: ServiceStatus,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<()> {
        validate_id(service_id)?;

        // A deadline past the clock's range means no deadline.
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let timeout_ms = timeout.map(duration_millis).unwrap_or_default();
        let mut polls: u32 = 0;

        loop {
            let read = tokio::select! {
                biased;

                _ = cancel.cancelled() => return Err(SdkError::Cancelled),
                _ = expired(deadline) => return Err(SdkError::DeadlineExceeded(timeout_ms)),
                read = self.read_service(service_id) => read,
            };
            polls += 1;

            let status = read?.status();
            if status == target {
                debug!(polls, "Service reached target status");
                return Ok(());
            }
            debug!(%status, polls, "Service not yet in target status");

            tokio::select! {
                biased;

                _ = cancel.cancelled() => return Err(SdkError::Cancelled),
                _ = expired(deadline) => return Err(SdkError::DeadlineExceeded(timeout_ms)),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn validate_id(id: &str) -> Result<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|e| SdkError::validation("id", format!("{:?} is not a UUID: {}", id, e)))
}

fn app_path(app_id: &str) -> String {
    format!("{}/{}", APPS_PATH, app_id)
}

fn service_path(service_id: &str) -> String {
    format!("{}/{}", SERVICES_PATH, service_id)
}

fn power_path(service_id: &str) -> String {
    format!("{}/{}/power", SERVICES_PATH, service_id)
}

fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| SdkError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
