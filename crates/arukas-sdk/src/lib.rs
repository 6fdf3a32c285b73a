// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Arukas SDK
//!
//! Client library for the Arukas container hosting API.
//!
//! This crate provides an ergonomic client for creating apps, updating and
//! powering services, and waiting for a service to reach a given status.
//!
//! # Architecture
//!
//! - Request parameters are validated locally before anything is sent
//!   (create and update have different rules).
//! - All network access goes through the [`Transport`] trait. The default
//!   [`HttpTransport`] speaks HTTPS with basic auth; [`MockTransport`] serves
//!   canned responses for tests.
//! - Responses decode into JSON:API envelopes. Service ports decode from both
//!   the structured (`{"protocol","number"}`) and compact (`"443/tcp"`)
//!   formats the API has used.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use arukas_sdk::{ArukasClient, ClientParam, Port, RequestParam, ServiceStatus, PLAN_FREE};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArukasClient::new(ClientParam::new("<token>", "<secret>"))?;
//!
//! // Create an app and its service
//! let app = client
//!     .create_app(
//!         &RequestParam::new("my-app", "nginx:latest")
//!             .with_port(Port::tcp(80))
//!             .with_env("FOO", "BAR")
//!             .with_plan(PLAN_FREE),
//!     )
//!     .await?;
//!
//! // Power on and wait until running
//! let service_id = app.service_id().unwrap_or_default().to_string();
//! client.power_on(&service_id).await?;
//! client
//!     .wait_for_state_timeout(&service_id, ServiceStatus::Running, Duration::from_secs(60))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod plan;
mod port;
mod request;
pub mod transport;
mod types;

pub use client::ArukasClient;
pub use config::{
    ClientParam, DEFAULT_API_BASE_URL, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, TraceOut,
    default_user_agent,
};
pub use error::{Result, SdkError, TransportError};
pub use plan::{
    DEFAULT_REGION, PLAN_FREE, PLAN_HOBBY, PLAN_STANDARD_1, PLAN_STANDARD_2, REGION_JP_TOKYO,
    VALID_PLANS, VALID_REGIONS, is_valid_plan, is_valid_region, plan_id,
};
pub use port::{
    MAX_PORT_NUMBER, MIN_PORT_NUMBER, PROTOCOL_TCP, PROTOCOL_UDP, Port, PortParseError,
    VALID_PROTOCOLS,
};
pub use request::RequestParam;
pub use tokio_util::sync::CancellationToken;
pub use transport::Transport;
pub use transport::http::HttpTransport;
pub use transport::mock::{MockTransport, RecordedCall};
pub use types::{
    App, AppAttr, AppData, AppListData, AppRelationships, Env, PortMapping, Relationship,
    ResourceRef, Service, ServiceAttr, ServiceData, ServiceListData, ServiceRelationships,
    ServiceStatus, TYPE_APPS, TYPE_SERVICE_PLANS, TYPE_SERVICES, TYPE_USERS,
};
